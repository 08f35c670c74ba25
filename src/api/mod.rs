// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients HTTP vers les trois providers externes :
// taux de change, métadonnées pays, séries historiques
// ============================================================================

pub mod countries; // Lookup pays par devise (restcountries)
pub mod history;   // Séries historiques (Frankfurter)
pub mod rates;     // Table des taux (ExchangeRate-API)

// Re-export des fonctions principales
pub use countries::resolve_country;
pub use history::{fetch_history, HistoryRange, HistorySeries};
pub use rates::{fetch_latest_rates, BASE_CURRENCY};
