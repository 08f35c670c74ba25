// ============================================================================
// Chart - Rendu du graphique historique
// ============================================================================
// Affiche l'historique du taux from -> to du convertisseur sur la période
// choisie (7 jours, 30 jours, 1 an)
//
// CONCEPTS RUST :
// 1. Option handling : série absente, en cours de chargement, ou en erreur
// 2. Iterator chaining : transformer les points (date, taux) en (x, y)
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : bornes et labels des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::api::HistorySeries;
use crate::app::App;

/// Dessine l'écran graphique
///
/// Trois états possibles : chargement en cours, pas de données (échec du
/// provider historique, qui ne dégrade que ce panneau), série affichable.
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Titre
            Constraint::Min(0),    // Graphique
        ])
        .split(area)
        .to_vec();

    render_chart_header(frame, app, chunks[0]);

    if app.history_loading {
        render_message(frame, app, chunks[1], "⏳ ...");
        return;
    }

    match &app.history {
        Some(series) if !series.points.is_empty() => {
            render_chart_graph(frame, app, series, chunks[1]);
        }
        _ => {
            // Échec ou série vide : état "no data", le tableau et le
            // convertisseur ne sont pas affectés
            let labels = app.lang.labels();
            render_message(frame, app, chunks[1], labels.no_data);
        }
    }
}

/// Dessine le titre : paire de devises, période, raccourcis
fn render_chart_header(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    let theme = app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()))
        .title(format!(" 📈 {} ", labels.historical));

    let text = vec![Line::from(vec![
        Span::styled(
            format!("{} → {}", app.converter.from, app.converter.to),
            Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("({})", app.history_range.label(app.lang)),
            Style::default().fg(theme.rate()),
        ),
        Span::raw("  "),
        Span::styled("[h/l]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::raw(" Range  "),
        Span::styled("[i]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::raw(" PNG  "),
        Span::styled("[ESC]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::raw(" Retour"),
    ])];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine un message centré à la place du graphique
fn render_message(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.dim()),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le graphique ligne de la série
///
/// CONCEPT RUST : Iterator chaining
/// - x = index du point, y = taux
/// - Les bornes Y sont min/max de la série (avec une petite marge pour que
///   la ligne ne colle pas aux bords)
fn render_chart_graph(frame: &mut Frame, app: &App, series: &HistorySeries, area: Rect) {
    let theme = app.theme;

    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, rate))| (i as f64, *rate))
        .collect();

    let (min, max) = series.bounds().unwrap_or((0.0, 1.0));
    let margin = ((max - min) * 0.05).max(max.abs() * 0.001).max(f64::EPSILON);
    let y_bounds = [min - margin, max + margin];

    // Labels d'axes : première/dernière date, bornes des taux
    let first_date = series.points.first().map(|(date, _)| date.to_string());
    let last_date = series.points.last().map(|(date, _)| date.to_string());

    let x_labels = vec![
        Span::styled(
            first_date.unwrap_or_default(),
            Style::default().fg(theme.dim()),
        ),
        Span::styled(
            last_date.unwrap_or_default(),
            Style::default().fg(theme.dim()),
        ),
    ];
    let y_labels = vec![
        Span::styled(format!("{:.4}", y_bounds[0]), Style::default().fg(theme.dim())),
        Span::styled(format!("{:.4}", (y_bounds[0] + y_bounds[1]) / 2.0), Style::default().fg(theme.dim())),
        Span::styled(format!("{:.4}", y_bounds[1]), Style::default().fg(theme.dim())),
    ];

    let dataset = Dataset::default()
        .name(format!("{}/{}", series.from, series.to))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.rate()))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent())),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (points.len().saturating_sub(1)) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}
