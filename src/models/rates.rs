// ============================================================================
// Structure : RateTable
// ============================================================================
// La table des taux de change : devise -> taux par rapport à la devise de base
//
// CONCEPTS RUST :
// 1. Double structure : Vec pour l'ordre, HashMap pour les lookups O(1)
// 2. Invariant de construction : validé dans from_pairs()
// 3. Encapsulation : champs privés, accès via méthodes publiques
//
// IMPORTANT : l'ordre des devises est celui renvoyé par le provider.
// Le tableau affiché et les exports doivent suivre exactement cet ordre.
// ============================================================================

use std::collections::HashMap;

use anyhow::{bail, Result};

/// Table des taux : "1 unité de base = taux unités de cette devise"
///
/// La table est remplacée en bloc à chaque fetch réussi (pas de mise à jour
/// partielle). Vide tant que le premier fetch n'a pas abouti.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    /// Devise de base (ex: "USD")
    base: String,

    /// Codes de devises dans l'ordre du provider
    codes: Vec<String>,

    /// Lookup code -> taux
    /// CONCEPT RUST : redondance contrôlée
    /// - codes garde l'ordre, rates permet le lookup O(1)
    /// - Les deux sont construits ensemble dans from_pairs()
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Construit la table à partir des paires (code, taux) dans l'ordre du provider
    ///
    /// Invariants vérifiés :
    /// - le taux de la devise de base est présent et vaut exactement 1
    /// - tous les taux sont strictement positifs
    ///
    /// Une payload qui viole un invariant est considérée malformée : la table
    /// est refusée en bloc (pas de succès partiel).
    pub fn from_pairs(base: &str, pairs: Vec<(String, f64)>) -> Result<Self> {
        let mut codes = Vec::with_capacity(pairs.len());
        let mut rates = HashMap::with_capacity(pairs.len());

        for (code, rate) in pairs {
            if rate <= 0.0 || !rate.is_finite() {
                bail!("Invalid rate for {}: {}", code, rate);
            }
            if !rates.contains_key(&code) {
                codes.push(code.clone());
            }
            rates.insert(code, rate);
        }

        // La devise de base doit valoir exactement 1 par rapport à elle-même
        match rates.get(base) {
            Some(&rate) if rate == 1.0 => {}
            Some(&rate) => bail!("Base currency {} has rate {} (expected 1)", base, rate),
            None => bail!("Base currency {} missing from rate table", base),
        }

        Ok(Self {
            base: base.to_string(),
            codes,
            rates,
        })
    }

    /// Devise de base de la table
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Codes connus, dans l'ordre du provider
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Taux d'une devise (None si le code est inconnu)
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Nombre de devises connues
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Vérifie si la table est vide (aucun fetch réussi pour l'instant)
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RateTable {
        RateTable::from_pairs(
            "USD",
            vec![
                ("USD".to_string(), 1.0),
                ("THB".to_string(), 35.5),
                ("EUR".to_string(), 0.92),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_provider_order_is_preserved() {
        let table = sample();
        assert_eq!(table.codes(), &["USD", "THB", "EUR"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let table = sample();
        assert_eq!(table.get("THB"), Some(35.5));
        assert_eq!(table.get("XXX"), None);
    }

    #[test]
    fn test_base_rate_must_be_one() {
        let err = RateTable::from_pairs(
            "USD",
            vec![("USD".to_string(), 2.0), ("THB".to_string(), 35.5)],
        );
        assert!(err.is_err());

        let missing = RateTable::from_pairs("USD", vec![("THB".to_string(), 35.5)]);
        assert!(missing.is_err());
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        let err = RateTable::from_pairs(
            "USD",
            vec![("USD".to_string(), 1.0), ("ZRO".to_string(), 0.0)],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_until_first_fetch() {
        let table = RateTable::default();
        assert!(table.is_empty());
        assert_eq!(table.get("USD"), None);
    }
}
