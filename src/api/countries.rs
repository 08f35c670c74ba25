// ============================================================================
// API Client : Pays par devise
// ============================================================================
// Pour chaque code de devise, interroge restcountries.com et garde les pays
// dont c'est la SEULE devise officielle
//
// CONCEPTS RUST :
// 1. Isolation des échecs : resolve_country() ne retourne jamais d'erreur,
//    un échec devient une entrée placeholder pour cette devise uniquement
// 2. Fonction pure qualifying_entries() : le filtre est testable sans réseau
// 3. Option chaining : and_then / unwrap_or pour les champs optionnels
// ============================================================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::i18n::Lang;
use crate::models::CountryEntry;

/// Endpoint du provider de métadonnées pays (un GET par code de devise)
const COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1/currency";

/// Champs demandés au provider (réduit la taille des réponses)
const COUNTRY_FIELDS: &str = "name,currencies,flag,flags,translations";

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================

/// Un pays tel que renvoyé par restcountries
#[derive(Debug, Deserialize, Default)]
struct CountryRecord {
    name: Option<CountryName>,

    /// Map code devise -> détails ; sert au test "seule devise officielle"
    currencies: Option<HashMap<String, serde_json::Value>>,

    /// Drapeau emoji (ex: "🇹🇭")
    flag: Option<String>,

    /// Références d'images du drapeau, par format
    flags: Option<FlagImages>,

    /// Traductions du nom, clé ISO 639-3 (ex: "jpn")
    translations: Option<HashMap<String, Translation>>,
}

#[derive(Debug, Deserialize, Default)]
struct CountryName {
    common: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FlagImages {
    png: Option<String>,
    svg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    common: Option<String>,
}

// ============================================================================
// Filtre "seule devise officielle"
// ============================================================================

/// Convertit les pays renvoyés par le provider en entrées qualifiantes
///
/// Règle : un pays est attribué à une devise seulement si sa map currencies
/// contient exactement une clé, égale au code recherché. Un pays à plusieurs
/// devises officielles n'est attribué à aucune d'entre elles.
///
/// Nom : traduction localisée si disponible, sinon nom commun.
/// Drapeau image : PNG préféré, sinon SVG.
/// L'ordre du provider est conservé.
fn qualifying_entries(code: &str, records: Vec<CountryRecord>, lang: Lang) -> Vec<CountryEntry> {
    records
        .into_iter()
        .filter(|record| {
            match &record.currencies {
                Some(currencies) => {
                    currencies.len() == 1 && currencies.keys().next().map(String::as_str) == Some(code)
                }
                None => false,
            }
        })
        .map(|record| {
            // Nom localisé préféré, sinon nom commun, sinon le code lui-même
            let translated = lang.translation_key().and_then(|key| {
                record
                    .translations
                    .as_ref()
                    .and_then(|translations| translations.get(key))
                    .and_then(|translation| translation.common.clone())
            });
            let name = translated
                .or_else(|| record.name.and_then(|name| name.common))
                .unwrap_or_else(|| code.to_string());

            // Priorité des formats d'image : PNG puis SVG
            let flag_url = record
                .flags
                .and_then(|flags| flags.png.or(flags.svg));

            CountryEntry::new(name, record.flag, flag_url)
        })
        .collect()
}

// ============================================================================
// Lookup réseau
// ============================================================================

/// Interroge le provider pour un code de devise
///
/// - 404 : le provider affirme qu'aucun pays n'utilise ce code -> séquence
///   vide (la devise n'apparaîtra pas dans le tableau)
/// - tout autre échec remonte en erreur (converti en placeholder par
///   resolve_country)
async fn lookup(code: &str, lang: Lang) -> Result<Vec<CountryEntry>> {
    let url = format!("{}/{}?fields={}", COUNTRIES_API_URL, code, COUNTRY_FIELDS);
    debug!(url = %url, "Fetching countries for currency");

    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach the country provider for {}", code))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    if !response.status().is_success() {
        bail!(
            "Country provider returned status {} for {}",
            response.status(),
            code
        );
    }

    let records: Vec<CountryRecord> = response
        .json()
        .await
        .with_context(|| format!("Failed to parse the country provider response for {}", code))?;

    Ok(qualifying_entries(code, records, lang))
}

/// Résout les pays d'une devise, sans jamais échouer
///
/// L'échec d'un lookup est isolé : il devient une unique entrée placeholder
/// ("-", sans drapeau) pour cette devise, et n'invalide ni les autres devises
/// ni la table des taux.
#[instrument(skip(lang))]
pub async fn resolve_country(code: &str, lang: Lang) -> Vec<CountryEntry> {
    match lookup(code, lang).await {
        Ok(entries) => {
            debug!(code = %code, countries = entries.len(), "Country lookup settled");
            entries
        }
        Err(e) => {
            // Échec silencieux côté utilisateur : juste le placeholder
            warn!(code = %code, error = ?e, "Country lookup failed, using placeholder");
            vec![CountryEntry::placeholder()]
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<CountryRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sole_currency_filter_keeps_single_currency_country() {
        let records = parse(
            r#"[{
                "name": { "common": "Thailand" },
                "currencies": { "THB": { "name": "Thai baht" } },
                "flag": "🇹🇭",
                "flags": { "png": "https://flagcdn.com/w320/th.png",
                           "svg": "https://flagcdn.com/th.svg" }
            }]"#,
        );

        let entries = qualifying_entries("THB", records, Lang::En);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Thailand");
        assert_eq!(entries[0].flag.as_deref(), Some("🇹🇭"));
        assert_eq!(
            entries[0].flag_url.as_deref(),
            Some("https://flagcdn.com/w320/th.png")
        );
    }

    #[test]
    fn test_multi_currency_country_is_excluded() {
        // Un pays à deux devises officielles n'est attribué à aucune
        let records = parse(
            r#"[{
                "name": { "common": "Panama" },
                "currencies": { "PAB": {}, "USD": {} }
            }]"#,
        );

        assert!(qualifying_entries("USD", records, Lang::En).is_empty());
    }

    #[test]
    fn test_wrong_sole_currency_is_excluded() {
        // Une seule devise, mais pas celle recherchée
        let records = parse(
            r#"[{
                "name": { "common": "Japan" },
                "currencies": { "JPY": {} }
            }]"#,
        );

        assert!(qualifying_entries("THB", records, Lang::En).is_empty());
    }

    #[test]
    fn test_provider_order_is_preserved() {
        let records = parse(
            r#"[
                { "name": { "common": "Ecuador" }, "currencies": { "USD": {} } },
                { "name": { "common": "United States" }, "currencies": { "USD": {} } }
            ]"#,
        );

        let entries = qualifying_entries("USD", records, Lang::En);
        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["Ecuador", "United States"]);
    }

    #[test]
    fn test_localized_name_preferred_with_fallback() {
        let records = parse(
            r#"[{
                "name": { "common": "Japan" },
                "currencies": { "JPY": {} },
                "translations": { "jpn": { "common": "日本" } }
            }]"#,
        );
        let entries = qualifying_entries("JPY", records, Lang::Jp);
        assert_eq!(entries[0].name, "日本");

        // Traduction absente -> retombe sur le nom commun
        let records = parse(
            r#"[{
                "name": { "common": "Japan" },
                "currencies": { "JPY": {} },
                "translations": {}
            }]"#,
        );
        let entries = qualifying_entries("JPY", records, Lang::Jp);
        assert_eq!(entries[0].name, "Japan");
    }

    #[test]
    fn test_flag_svg_fallback_when_png_missing() {
        let records = parse(
            r#"[{
                "name": { "common": "Thailand" },
                "currencies": { "THB": {} },
                "flags": { "svg": "https://flagcdn.com/th.svg" }
            }]"#,
        );

        let entries = qualifying_entries("THB", records, Lang::En);
        assert_eq!(
            entries[0].flag_url.as_deref(),
            Some("https://flagcdn.com/th.svg")
        );
    }

    #[test]
    fn test_record_without_currencies_is_excluded() {
        let records = parse(r#"[{ "name": { "common": "Nowhere" } }]"#);
        assert!(qualifying_entries("THB", records, Lang::En).is_empty());
    }
}
