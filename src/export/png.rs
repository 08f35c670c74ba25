// ============================================================================
// Export PNG
// ============================================================================
// Rastérise le graphique historique courant dans une image PNG
//
// CONCEPTS RUST :
// 1. Crate image : buffer RGB en mémoire, encodage PNG via save()
// 2. Fonction pure scale_points() : la mise à l'échelle est testable sans
//    écrire d'image
//
// Le tracé est volontairement simple : fond au thème courant, cadre, et la
// polyligne des taux reliée point à point.
// ============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};
use tracing::info;

use crate::api::HistorySeries;
use crate::i18n::Theme;

/// Nom de fichier par défaut de l'export PNG
pub const PNG_FILENAME: &str = "rate_history.png";

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;
const MARGIN: u32 = 40;

/// Met à l'échelle les taux dans une zone de tracé width × height
///
/// - x : réparti uniformément sur la largeur (un seul point -> x = 0)
/// - y : interpolé entre min et max, y = 0 en haut (repère image)
/// - série plate (min == max) : ligne centrée verticalement
fn scale_points(rates: &[f64], width: u32, height: u32) -> Vec<(u32, u32)> {
    if rates.is_empty() || width == 0 || height == 0 {
        return Vec::new();
    }

    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let last_x = (width - 1) as f64;
    let last_y = (height - 1) as f64;
    let count = rates.len();

    rates
        .iter()
        .enumerate()
        .map(|(i, &rate)| {
            let x = if count == 1 {
                0
            } else {
                (i as f64 * last_x / (count - 1) as f64).round() as u32
            };
            let y = if span == 0.0 {
                height / 2
            } else {
                (last_y - (rate - min) / span * last_y).round() as u32
            };
            (x, y)
        })
        .collect()
}

/// Trace un segment entre deux pixels (interpolation linéaire)
fn draw_line(img: &mut RgbImage, from: (u32, u32), to: (u32, u32), color: Rgb<u8>) {
    let (x0, y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);

    for step in 0..=steps {
        let x = x0 + (x1 - x0) * step / steps;
        let y = y0 + (y1 - y0) * step / steps;
        if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Exporte le graphique historique en PNG
///
/// Échoue si la série est vide (rien à tracer) : l'appelant affiche le
/// message d'échec dans la barre de statut.
pub fn export_chart_png(series: &HistorySeries, theme: Theme, path: &Path) -> Result<()> {
    if series.points.is_empty() {
        bail!("No history data to export");
    }

    let (background, frame, line) = match theme {
        Theme::Dark => (Rgb([18, 18, 28]), Rgb([90, 90, 110]), Rgb([240, 200, 60])),
        Theme::Light => (Rgb([255, 255, 255]), Rgb([160, 160, 160]), Rgb([30, 90, 200])),
    };

    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, background);

    // Cadre de la zone de tracé
    let left = MARGIN;
    let right = WIDTH - MARGIN - 1;
    let top = MARGIN;
    let bottom = HEIGHT - MARGIN - 1;
    draw_line(&mut img, (left, top), (right, top), frame);
    draw_line(&mut img, (left, bottom), (right, bottom), frame);
    draw_line(&mut img, (left, top), (left, bottom), frame);
    draw_line(&mut img, (right, top), (right, bottom), frame);

    // Polyligne des taux
    let rates: Vec<f64> = series.points.iter().map(|(_, rate)| *rate).collect();
    let plot_width = WIDTH - 2 * MARGIN;
    let plot_height = HEIGHT - 2 * MARGIN;
    let points: Vec<(u32, u32)> = scale_points(&rates, plot_width, plot_height)
        .into_iter()
        .map(|(x, y)| (x + MARGIN, y + MARGIN))
        .collect();

    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], line);
    }

    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(points = series.points.len(), path = %path.display(), "PNG export written");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_points_endpoints() {
        let points = scale_points(&[1.0, 2.0, 3.0], 100, 50);

        // Premier point : min -> en bas à gauche ; dernier : max -> en haut
        assert_eq!(points[0], (0, 49));
        assert_eq!(points[2], (99, 0));
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_scale_points_flat_series_is_centered() {
        let points = scale_points(&[5.0, 5.0, 5.0], 100, 50);
        assert!(points.iter().all(|&(_, y)| y == 25));
    }

    #[test]
    fn test_scale_points_single_point() {
        let points = scale_points(&[42.0], 100, 50);
        assert_eq!(points, vec![(0, 25)]);
    }

    #[test]
    fn test_scale_points_empty() {
        assert!(scale_points(&[], 100, 50).is_empty());
    }

    #[test]
    fn test_export_refuses_empty_series() {
        use crate::api::HistoryRange;

        let series = HistorySeries {
            from: "USD".to_string(),
            to: "THB".to_string(),
            range: HistoryRange::Days7,
            points: Vec::new(),
        };

        let path = std::env::temp_dir().join("worldrates_test_chart.png");
        assert!(export_chart_png(&series, Theme::Dark, &path).is_err());
    }
}
