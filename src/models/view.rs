// ============================================================================
// View Model : réconciliation taux / pays
// ============================================================================
// Le cœur de l'application : joindre la table des taux (code -> taux) avec
// les résultats du resolver de pays (code -> [pays]) pour produire la
// séquence de lignes affichables, filtrée par la recherche.
//
// CONCEPTS RUST :
// 1. Fonction pure : mêmes entrées => même sortie, dans le même ordre
// 2. Flattening : une devise à N pays produit N lignes
// 3. Iterator chaining : flat_map + filter
//
// Règles de cardinalité (une devise de la table des taux peut avoir) :
// - lookup pas encore settled : aucune ligne pour l'instant
// - zéro pays qualifiant : aucune ligne (absent, pas de ligne "-")
// - N pays : N lignes, dans l'ordre renvoyé par le provider
// - lookup échoué : une ligne placeholder "-"
// ============================================================================

use std::collections::HashMap;

use crate::models::{CountryEntry, RateTable};

/// Une ligne du tableau : une paire (devise, pays) aplatie
///
/// Dérivée, jamais persistée : recalculée à chaque changement de la table
/// des taux, des pays ou de la recherche.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// Code de la devise (ex: "THB")
    pub code: String,

    /// Taux : 1 unité de base = rate unités de cette devise
    pub rate: f64,

    /// Nom du pays ("-" si le lookup a échoué)
    pub country: String,

    /// Drapeau emoji, si connu
    pub flag: Option<String>,

    /// URL de l'image du drapeau, si connue
    pub flag_url: Option<String>,
}

/// Teste si une ligne correspond à la recherche
///
/// Match insensible à la casse, par sous-chaîne, sur le code de devise OU le
/// nom du pays. Une recherche vide matche tout.
///
/// Exemple : "THA" matche la ligne Thailand/THB via le nom du pays, même si
/// "THA" n'est pas une sous-chaîne de "THB".
pub fn matches_query(row: &DisplayRow, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    row.code.to_lowercase().contains(&query) || row.country.to_lowercase().contains(&query)
}

/// Construit la séquence des lignes visibles
///
/// Fonction pure et idempotente : (RateTable, pays, recherche) identiques
/// donnent toujours la même séquence dans le même ordre. L'ordre stable est :
/// - devises dans l'ordre renvoyé par le rate provider
/// - pays d'une même devise dans l'ordre renvoyé par le country provider
///
/// Les devises dont le lookup pays n'a pas encore settled (absentes de la
/// map) ne produisent aucune ligne : la vue affichée reste cohérente à tout
/// instant pendant que les lookups arrivent dans le désordre.
pub fn visible_rows(
    rates: &RateTable,
    countries: &HashMap<String, Vec<CountryEntry>>,
    query: &str,
) -> Vec<DisplayRow> {
    rates
        .codes()
        .iter()
        .flat_map(|code| {
            let rate = rates.get(code).unwrap_or(f64::NAN);
            countries
                .get(code)
                .map(|entries| entries.as_slice())
                .unwrap_or(&[])
                .iter()
                .map(move |entry| DisplayRow {
                    code: code.clone(),
                    rate,
                    country: entry.name.clone(),
                    flag: entry.flag.clone(),
                    flag_url: entry.flag_url.clone(),
                })
        })
        .filter(|row| matches_query(row, query))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> RateTable {
        RateTable::from_pairs(
            "USD",
            vec![
                ("USD".to_string(), 1.0),
                ("THB".to_string(), 35.5),
                ("XXX".to_string(), 2.0),
                ("EUR".to_string(), 0.92),
            ],
        )
        .unwrap()
    }

    fn entry(name: &str, flag: &str) -> CountryEntry {
        CountryEntry::new(name.to_string(), Some(flag.to_string()), None)
    }

    fn countries() -> HashMap<String, Vec<CountryEntry>> {
        let mut map = HashMap::new();
        map.insert(
            "USD".to_string(),
            vec![entry("United States", "🇺🇸"), entry("Ecuador", "🇪🇨")],
        );
        map.insert("THB".to_string(), vec![entry("Thailand", "🇹🇭")]);
        // XXX : settled, mais aucun pays qualifiant
        map.insert("XXX".to_string(), vec![]);
        map.insert("EUR".to_string(), vec![CountryEntry::placeholder()]);
        map
    }

    #[test]
    fn test_flattening_one_row_per_country() {
        let rows = visible_rows(&rates(), &countries(), "");

        // USD a 2 pays -> 2 lignes, THB 1, XXX 0, EUR 1 (placeholder)
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].code, "USD");
        assert_eq!(rows[0].country, "United States");
        assert_eq!(rows[1].code, "USD");
        assert_eq!(rows[1].country, "Ecuador");
        assert_eq!(rows[2].code, "THB");
        assert_eq!(rows[3].code, "EUR");
        assert_eq!(rows[3].country, "-");
    }

    #[test]
    fn test_currency_without_qualifying_country_is_absent() {
        // XXX est dans la table des taux mais n'a aucun pays : zéro ligne,
        // quelle que soit la recherche
        let rows = visible_rows(&rates(), &countries(), "");
        assert!(rows.iter().all(|row| row.code != "XXX"));

        let rows = visible_rows(&rates(), &countries(), "XXX");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unsettled_lookup_produces_no_rows() {
        let mut map = countries();
        map.remove("THB"); // lookup pas encore settled

        let rows = visible_rows(&rates(), &map, "");
        assert!(rows.iter().all(|row| row.code != "THB"));
    }

    #[test]
    fn test_search_matches_code_or_country_name() {
        let rows = visible_rows(&rates(), &countries(), "THA");

        // "THA" n'est pas une sous-chaîne de "THB", mais matche "Thailand"
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "THB");
        assert_eq!(rows[0].country, "Thailand");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let rows = visible_rows(&rates(), &countries(), "thb");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "THB");
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let all = visible_rows(&rates(), &countries(), "");
        let filtered = visible_rows(&rates(), &countries(), "usd");
        assert!(filtered.len() < all.len());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_search_is_a_pure_predicate() {
        // Même (données, recherche) => même séquence, à chaque appel
        let first = visible_rows(&rates(), &countries(), "united");
        let second = visible_rows(&rates(), &countries(), "united");
        assert_eq!(first, second);

        // Filtrer la séquence complète avec le prédicat donne le même
        // résultat que visible_rows avec la recherche
        let all = visible_rows(&rates(), &countries(), "");
        let manual: Vec<DisplayRow> = all
            .into_iter()
            .filter(|row| matches_query(row, "united"))
            .collect();
        assert_eq!(manual, first);
    }

    #[test]
    fn test_order_follows_rate_provider() {
        // L'ordre des lignes suit l'ordre des codes du rate provider,
        // pas l'ordre d'insertion dans la map des pays
        let rows = visible_rows(&rates(), &countries(), "");
        let codes: Vec<&str> = rows.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, vec!["USD", "USD", "THB", "EUR"]);
    }
}
