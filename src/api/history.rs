// ============================================================================
// API Client : Séries historiques
// ============================================================================
// Récupère l'historique d'un taux from -> to sur une période donnée
// (7 jours, 30 jours ou 1 an) depuis l'API Frankfurter
//
// CONCEPTS RUST :
// 1. BTreeMap : les clés (dates ISO) sortent triées chronologiquement
// 2. Chrono : calcul des bornes de la période
//
// Un échec ici ne dégrade que le panneau graphique ("no data") : le tableau
// et le convertisseur ne sont pas affectés.
// ============================================================================

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::i18n::Lang;

/// Endpoint du provider de séries historiques
const HISTORY_API_URL: &str = "https://api.frankfurter.app";

// ============================================================================
// Période
// ============================================================================

/// Période du graphique historique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryRange {
    Days7,
    #[default]
    Days30,
    Year1,
}

impl HistoryRange {
    /// Nombre de jours couverts par la période
    pub fn days(&self) -> i64 {
        match self {
            HistoryRange::Days7 => 7,
            HistoryRange::Days30 => 30,
            HistoryRange::Year1 => 365,
        }
    }

    /// Période suivante (touche l sur le graphique)
    pub fn next(&self) -> Self {
        match self {
            HistoryRange::Days7 => HistoryRange::Days30,
            HistoryRange::Days30 => HistoryRange::Year1,
            HistoryRange::Year1 => HistoryRange::Days7,
        }
    }

    /// Période précédente (touche h sur le graphique)
    pub fn previous(&self) -> Self {
        match self {
            HistoryRange::Days7 => HistoryRange::Year1,
            HistoryRange::Days30 => HistoryRange::Days7,
            HistoryRange::Year1 => HistoryRange::Days30,
        }
    }

    /// Libellé localisé de la période
    pub fn label(&self, lang: Lang) -> &'static str {
        let labels = lang.labels();
        match self {
            HistoryRange::Days7 => labels.days7,
            HistoryRange::Days30 => labels.days30,
            HistoryRange::Year1 => labels.year1,
        }
    }
}

// ============================================================================
// Série
// ============================================================================

/// Série historique d'un taux from -> to
#[derive(Debug, Clone)]
pub struct HistorySeries {
    pub from: String,
    pub to: String,
    pub range: HistoryRange,

    /// Points (date, taux), triés par date croissante
    pub points: Vec<(NaiveDate, f64)>,
}

impl HistorySeries {
    /// Bornes min/max des taux de la série (None si elle est vide)
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|(_, rate)| *rate);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), rate| {
            (min.min(rate), max.max(rate))
        });
        Some((min, max))
    }
}

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================

/// Réponse du provider : { "rates": { "2024-01-02": { "THB": 34.9 }, ... } }
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    /// BTreeMap : les dates ISO (AAAA-MM-JJ) triées lexicalement sont
    /// triées chronologiquement
    rates: BTreeMap<String, HashMap<String, f64>>,
}

/// Convertit la réponse en série de points datés
fn series_from_response(
    response: HistoryResponse,
    from: &str,
    to: &str,
    range: HistoryRange,
) -> Result<HistorySeries> {
    let mut points = Vec::with_capacity(response.rates.len());

    for (date, rates) in response.rates {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date in history response: {}", date))?;

        // Les dates sans la devise cible sont simplement ignorées
        if let Some(&rate) = rates.get(to) {
            points.push((date, rate));
        }
    }

    Ok(HistorySeries {
        from: from.to_string(),
        to: to.to_string(),
        range,
        points,
    })
}

/// Récupère la série historique d'un taux
///
/// Un GET paramétré par dates de début/fin et codes from/to. Échec réseau,
/// statut non-2xx ou payload illisible : l'erreur remonte et le graphique
/// passe en état "no data".
#[instrument(skip(range))]
pub async fn fetch_history(from: &str, to: &str, range: HistoryRange) -> Result<HistorySeries> {
    let end = Utc::now().date_naive();
    let start = end - Duration::days(range.days());

    let url = format!(
        "{}/{}..{}?from={}&to={}",
        HISTORY_API_URL, start, end, from, to
    );
    debug!(url = %url, "Fetching rate history");

    let response = reqwest::get(&url)
        .await
        .context("Failed to reach the history provider")?;

    if !response.status().is_success() {
        bail!("History provider returned status {}", response.status());
    }

    let payload: HistoryResponse = response
        .json()
        .await
        .context("Failed to parse the history provider response")?;

    let series = series_from_response(payload, from, to, range)?;
    info!(from = %from, to = %to, points = series.points.len(), "History loaded");
    Ok(series)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_sorted_by_date() {
        // Réponse volontairement dans le désordre : le BTreeMap retrie
        let json = r#"{
            "rates": {
                "2024-01-03": { "THB": 35.1 },
                "2024-01-01": { "THB": 34.9 },
                "2024-01-02": { "THB": 35.0 }
            }
        }"#;

        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        let series =
            series_from_response(response, "USD", "THB", HistoryRange::Days7).unwrap();

        let rates: Vec<f64> = series.points.iter().map(|(_, rate)| *rate).collect();
        assert_eq!(rates, vec![34.9, 35.0, 35.1]);
        assert_eq!(series.bounds(), Some((34.9, 35.1)));
    }

    #[test]
    fn test_dates_without_target_code_are_skipped() {
        let json = r#"{
            "rates": {
                "2024-01-01": { "THB": 34.9 },
                "2024-01-02": { "EUR": 0.92 }
            }
        }"#;

        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        let series =
            series_from_response(response, "USD", "THB", HistoryRange::Days7).unwrap();
        assert_eq!(series.points.len(), 1);
    }

    #[test]
    fn test_empty_series_has_no_bounds() {
        let series = HistorySeries {
            from: "USD".to_string(),
            to: "THB".to_string(),
            range: HistoryRange::Days7,
            points: Vec::new(),
        };
        assert_eq!(series.bounds(), None);
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let json = r#"{ "rates": { "not-a-date": { "THB": 34.9 } } }"#;
        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        assert!(series_from_response(response, "USD", "THB", HistoryRange::Days7).is_err());
    }

    #[test]
    fn test_range_cycle() {
        let range = HistoryRange::Days7;
        assert_eq!(range.next(), HistoryRange::Days30);
        assert_eq!(range.next().next(), HistoryRange::Year1);
        assert_eq!(range.next().next().next(), HistoryRange::Days7);
        assert_eq!(range.previous(), HistoryRange::Year1);
    }
}
