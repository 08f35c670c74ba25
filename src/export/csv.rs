// ============================================================================
// Export CSV
// ============================================================================
// Écrit les lignes visibles du tableau dans un fichier CSV
//
// CONCEPT RUST : crate csv
// - Writer gère l'échappement (virgules, guillemets) automatiquement
// - flush() obligatoire : le Writer bufferise
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::export::{row_record, TABLE_HEADER};
use crate::models::DisplayRow;

/// Nom de fichier par défaut de l'export CSV
pub const CSV_FILENAME: &str = "world_rates.csv";

/// Exporte les lignes visibles en CSV
pub fn export_csv(rows: &[DisplayRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(TABLE_HEADER)?;
    for (index, row) in rows.iter().enumerate() {
        writer.write_record(&row_record(index, row))?;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    info!(rows = rows.len(), path = %path.display(), "CSV export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_csv_roundtrip() {
        let rows = vec![
            DisplayRow {
                code: "THB".to_string(),
                rate: 35.5,
                country: "Thailand".to_string(),
                flag: Some("🇹🇭".to_string()),
                flag_url: Some("https://flagcdn.com/w320/th.png".to_string()),
            },
            DisplayRow {
                code: "EUR".to_string(),
                rate: 0.92,
                country: "Country, with comma".to_string(),
                flag: None,
                flag_url: None,
            },
        ];

        let path = std::env::temp_dir().join("worldrates_test_export.csv");
        export_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("#,Currency,Country,Flag,1 USD"));
        assert_eq!(
            lines.next(),
            Some("1,THB,Thailand,https://flagcdn.com/w320/th.png,35.5")
        );
        // La virgule dans le nom doit être échappée par des guillemets
        assert_eq!(lines.next(), Some("2,EUR,\"Country, with comma\",,0.92"));

        std::fs::remove_file(&path).ok();
    }
}
