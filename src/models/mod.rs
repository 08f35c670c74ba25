// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod converter; // État du convertisseur de devises
pub mod country;   // Pays associés à une devise
pub mod rates;     // Table des taux de change
pub mod view;      // Réconciliation taux/pays -> lignes affichables

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use worldrates::models::rates::RateTable;
// On peut faire : use worldrates::models::RateTable;
pub use converter::ConverterState;
pub use country::CountryEntry;
pub use rates::RateTable;
pub use view::{matches_query, visible_rows, DisplayRow};
