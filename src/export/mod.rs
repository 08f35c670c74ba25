// ============================================================================
// Module : export
// ============================================================================
// Sérialise la vue courante (lignes déjà filtrées par la recherche, dans
// l'ordre affiché) vers des fichiers téléchargeables : CSV, classeur Excel,
// PDF paginé, et le graphique historique en PNG.
//
// Transformations pures de données déjà réconciliées : aucun état propre,
// un buffer neuf par invocation, un nom de fichier fixe par format.
// ============================================================================

pub mod csv;   // Tableau -> CSV
pub mod excel; // Tableau -> classeur Excel
pub mod pdf;   // Tableau -> PDF paginé
pub mod png;   // Graphique historique -> image PNG

pub use csv::{export_csv, CSV_FILENAME};
pub use excel::{export_excel, EXCEL_FILENAME};
pub use pdf::{export_pdf, PDF_FILENAME};
pub use png::{export_chart_png, PNG_FILENAME};

use crate::models::DisplayRow;

/// En-têtes de colonnes des exports tabulaires
///
/// Les exports utilisent les en-têtes anglais quel que soit le thème ou la
/// langue de l'interface : un fichier exporté doit rester lisible hors du
/// contexte de la session.
pub const TABLE_HEADER: [&str; 5] = ["#", "Currency", "Country", "Flag", "1 USD"];

/// Formate une ligne du tableau pour les exports texte (CSV)
///
/// La colonne Flag contient l'URL de l'image (le terminal affiche l'emoji,
/// mais un fichier exporté référence l'image).
pub fn row_record(index: usize, row: &DisplayRow) -> [String; 5] {
    [
        (index + 1).to_string(),
        row.code.clone(),
        row.country.clone(),
        row.flag_url.clone().unwrap_or_default(),
        row.rate.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_record() {
        let row = DisplayRow {
            code: "THB".to_string(),
            rate: 35.5,
            country: "Thailand".to_string(),
            flag: Some("🇹🇭".to_string()),
            flag_url: Some("https://flagcdn.com/w320/th.png".to_string()),
        };

        let record = row_record(0, &row);
        assert_eq!(record[0], "1");
        assert_eq!(record[1], "THB");
        assert_eq!(record[2], "Thailand");
        assert_eq!(record[3], "https://flagcdn.com/w320/th.png");
        assert_eq!(record[4], "35.5");
    }

    #[test]
    fn test_row_record_without_flag() {
        let row = DisplayRow {
            code: "EUR".to_string(),
            rate: 0.92,
            country: "-".to_string(),
            flag: None,
            flag_url: None,
        };

        let record = row_record(4, &row);
        assert_eq!(record[0], "5");
        assert_eq!(record[3], "");
    }
}
