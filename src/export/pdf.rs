// ============================================================================
// Export PDF
// ============================================================================
// Écrit les lignes visibles du tableau dans un PDF paginé (format A4)
//
// CONCEPT RUST : printpdf
// - Une page par tranche de ROWS_PER_PAGE lignes
// - Polices builtin (Helvetica) : encodage latin uniquement, les noms de
//   pays non latins sortent dégradés
//
// Le drapeau n'est pas inclus : l'URL serait trop longue pour une colonne.
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::info;

use crate::models::DisplayRow;

/// Nom de fichier par défaut de l'export PDF
pub const PDF_FILENAME: &str = "world_rates.pdf";

/// Lignes de tableau par page A4
const ROWS_PER_PAGE: usize = 40;

// Géométrie de la page (A4 portrait, marges simples)
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP_Y: f32 = 280.0;
const LINE_HEIGHT: f32 = 6.0;

// Abscisses des colonnes : #, Currency, Country, 1 USD
const COL_X: [f32; 4] = [15.0, 30.0, 60.0, 150.0];

/// Nombre de pages nécessaires pour un nombre de lignes donné
///
/// Un tableau vide produit quand même une page (en-tête seul).
fn page_count(rows: usize) -> usize {
    if rows == 0 {
        1
    } else {
        rows.div_ceil(ROWS_PER_PAGE)
    }
}

/// Dessine l'en-tête et une tranche de lignes sur une page
fn draw_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    rows: &[DisplayRow],
    first_index: usize,
) {
    let header = ["#", "Currency", "Country", "1 USD"];
    for (col, title) in header.iter().enumerate() {
        layer.use_text(*title, 11.0, Mm(COL_X[col]), Mm(TOP_Y), bold);
    }

    for (offset, row) in rows.iter().enumerate() {
        let y = Mm(TOP_Y - LINE_HEIGHT * (offset as f32 + 1.5));
        layer.use_text((first_index + offset + 1).to_string(), 10.0, Mm(COL_X[0]), y, font);
        layer.use_text(row.code.clone(), 10.0, Mm(COL_X[1]), y, font);
        layer.use_text(row.country.clone(), 10.0, Mm(COL_X[2]), y, font);
        layer.use_text(format!("{}", row.rate), 10.0, Mm(COL_X[3]), y, font);
    }
}

/// Exporte les lignes visibles en PDF paginé
pub fn export_pdf(rows: &[DisplayRow], path: &Path) -> Result<()> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("World Rates", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "table");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    if rows.is_empty() {
        draw_page(&layer, &font, &bold, &[], 0);
    }

    for (page_index, chunk) in rows.chunks(ROWS_PER_PAGE).enumerate() {
        if page_index > 0 {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "table");
            layer = doc.get_page(page).get_layer(page_layer);
        }
        draw_page(&layer, &font, &bold, chunk, page_index * ROWS_PER_PAGE);
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .context("Failed to write PDF document")?;

    info!(
        rows = rows.len(),
        pages = page_count(rows.len()),
        path = %path.display(),
        "PDF export written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(ROWS_PER_PAGE), 1);
        assert_eq!(page_count(ROWS_PER_PAGE + 1), 2);
        assert_eq!(page_count(ROWS_PER_PAGE * 3), 3);
    }
}
