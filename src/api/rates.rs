// ============================================================================
// API Client : Taux de change
// ============================================================================
// Récupère la table complète des taux pour la devise de base depuis
// ExchangeRate-API (endpoint ouvert)
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Serde : désérialisation JSON automatique
// 3. serde_json::Map : avec la feature "preserve_order", les clés gardent
//    l'ordre de la réponse — l'ordre d'affichage du tableau en dépend
// ============================================================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::models::RateTable;

/// Devise de base : tous les taux sont exprimés en "1 USD = taux"
pub const BASE_CURRENCY: &str = "USD";

/// Endpoint du provider de taux
const RATES_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================
// Le provider renvoie un objet avec un statut et une map code -> taux.
// On définit des structures qui matchent la structure JSON pour que serde
// puisse désérialiser automatiquement.
// ============================================================================

/// Réponse du provider de taux
#[derive(Debug, Deserialize)]
struct RatesResponse {
    result: String,
    base_code: String,

    /// Map code -> taux, dans l'ordre renvoyé par le provider
    /// CONCEPT : serde_json::Map + preserve_order
    /// - Un HashMap perdrait l'ordre des clés
    /// - Le tableau affiché doit suivre l'ordre du provider
    rates: serde_json::Map<String, serde_json::Value>,
}

/// Convertit la réponse du provider en RateTable
///
/// Acceptation en bloc : la moindre valeur non numérique rend toute la
/// payload malformée (pas de table partielle).
fn table_from_response(response: RatesResponse) -> Result<RateTable> {
    if response.result != "success" {
        bail!("Rate provider returned result: {}", response.result);
    }
    if response.base_code != BASE_CURRENCY {
        bail!(
            "Rate provider returned base {} (expected {})",
            response.base_code,
            BASE_CURRENCY
        );
    }

    let mut pairs = Vec::with_capacity(response.rates.len());
    for (code, value) in response.rates {
        let rate = match value.as_f64() {
            Some(rate) => rate,
            None => bail!("Non-numeric rate for {}: {}", code, value),
        };
        pairs.push((code, rate));
    }

    RateTable::from_pairs(BASE_CURRENCY, pairs)
}

/// Récupère la table des taux pour la devise de base
///
/// Un seul appel au démarrage. En cas d'échec (réseau, statut non-2xx,
/// payload malformée), l'erreur remonte à l'appelant qui affiche l'écran
/// d'erreur : aucun retry automatique.
#[instrument]
pub async fn fetch_latest_rates() -> Result<RateTable> {
    debug!(url = RATES_API_URL, "Fetching rate table");

    let response = reqwest::get(RATES_API_URL)
        .await
        .context("Failed to reach the rate provider")?;

    if !response.status().is_success() {
        bail!("Rate provider returned status {}", response.status());
    }

    let payload: RatesResponse = response
        .json()
        .await
        .context("Failed to parse the rate provider response")?;

    let table = table_from_response(payload)?;
    info!(currencies = table.len(), "Rate table loaded");
    Ok(table)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates_response() {
        // L'ordre de la réponse n'est pas alphabétique : il doit être conservé
        let json = r#"{
            "result": "success",
            "base_code": "USD",
            "rates": { "USD": 1, "THB": 35.5, "EUR": 0.92, "AUD": 1.53 }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        let table = table_from_response(response).unwrap();

        assert_eq!(table.codes(), &["USD", "THB", "EUR", "AUD"]);
        assert_eq!(table.get("THB"), Some(35.5));
        assert_eq!(table.base(), "USD");
    }

    #[test]
    fn test_error_result_is_rejected() {
        let json = r#"{
            "result": "error",
            "base_code": "USD",
            "rates": {}
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(table_from_response(response).is_err());
    }

    #[test]
    fn test_non_numeric_rate_rejects_whole_table() {
        let json = r#"{
            "result": "success",
            "base_code": "USD",
            "rates": { "USD": 1, "THB": "oops" }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(table_from_response(response).is_err());
    }

    #[test]
    fn test_wrong_base_is_rejected() {
        let json = r#"{
            "result": "success",
            "base_code": "EUR",
            "rates": { "EUR": 1 }
        }"#;

        let response: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(table_from_response(response).is_err());
    }
}
