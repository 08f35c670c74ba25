// ============================================================================
// WorldRates - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // Clients HTTP : taux, pays, historique
pub mod app;     // État de l'application
pub mod export;  // Exports CSV / Excel / PDF / PNG
pub mod i18n;    // Langues et thèmes
pub mod models;  // Structures de données
pub mod ui;      // Interface utilisateur
