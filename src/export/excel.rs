// ============================================================================
// Export Excel
// ============================================================================
// Écrit les lignes visibles du tableau dans un classeur .xlsx
//
// CONCEPT RUST : rust_xlsxwriter
// - Workbook en mémoire, écrit d'un bloc avec save()
// - Les taux sont écrits comme nombres (pas comme texte) pour qu'Excel
//   puisse trier et calculer dessus
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::export::TABLE_HEADER;
use crate::models::DisplayRow;

/// Nom de fichier par défaut de l'export Excel
pub const EXCEL_FILENAME: &str = "world_rates.xlsx";

/// Exporte les lignes visibles en classeur Excel
pub fn export_excel(rows: &[DisplayRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("World Rates")?;

    // Ligne d'en-tête en gras
    for (col, title) in TABLE_HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let excel_row = (index + 1) as u32;
        worksheet.write_number(excel_row, 0, (index + 1) as f64)?;
        worksheet.write_string(excel_row, 1, &row.code)?;
        worksheet.write_string(excel_row, 2, &row.country)?;
        worksheet.write_string(excel_row, 3, row.flag_url.as_deref().unwrap_or(""))?;
        worksheet.write_number(excel_row, 4, row.rate)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "Excel export written");
    Ok(())
}
