// ============================================================================
// Structure : ConverterState
// ============================================================================
// État du convertisseur de devises : montant, devise source, devise cible
//
// CONCEPTS RUST :
// 1. Option<f64> comme sentinelle "inconnu" : tant que les deux taux ne sont
//    pas connus, le résultat est None (jamais zéro, jamais un panic)
// 2. std::mem::swap : échange pur des deux codes
//
// Le résultat est une fonction pure de (amount, from, to, RateTable) :
// result = amount × taux[to] / taux[from]. Il est recalculé à chaque
// affichage, jamais stocké (pas d'état dérivé qui peut se désynchroniser).
// ============================================================================

use crate::models::RateTable;

/// État du convertisseur
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    /// Montant à convertir (toujours >= 0)
    pub amount: f64,

    /// Code de la devise source
    pub from: String,

    /// Code de la devise cible
    pub to: String,
}

impl ConverterState {
    /// Crée un convertisseur avec le montant initial 1
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            amount: 1.0,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Met à jour le montant (borné à zéro : jamais négatif)
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    }

    /// Change la devise source
    pub fn set_from(&mut self, code: &str) {
        self.from = code.to_string();
    }

    /// Change la devise cible
    pub fn set_to(&mut self, code: &str) {
        self.to = code.to_string();
    }

    /// Échange source et cible
    ///
    /// CONCEPT RUST : std::mem::swap
    /// - Échange les deux String sans clone
    /// - Opération pure : deux swaps consécutifs restaurent l'état initial
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Calcule le résultat de la conversion
    ///
    /// - Some(amount × taux[to] / taux[from]) quand les deux taux sont connus
    /// - None (sentinelle "inconnu") si l'un des codes manque dans la table
    ///
    /// Un montant de zéro donne Some(0.0) : "converti à zéro" n'est pas
    /// la même chose que "pas encore chargé".
    pub fn result(&self, rates: &RateTable) -> Option<f64> {
        let from_rate = rates.get(&self.from)?;
        let to_rate = rates.get(&self.to)?;
        Some(self.amount * (to_rate / from_rate))
    }

    /// Formate le résultat pour l'affichage ("-" tant qu'il est inconnu)
    ///
    /// 4 décimales maximum, comme l'affichage d'origine.
    pub fn result_display(&self, rates: &RateTable) -> String {
        match self.result(rates) {
            Some(value) => format!("{:.4}", value),
            None => "-".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
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
    fn test_conversion_result() {
        let rates = table();
        let mut conv = ConverterState::new("USD", "THB");
        conv.set_amount(10.0);

        // 10 USD = 10 × 35.5 / 1 = 355 THB
        assert_eq!(conv.result(&rates), Some(355.0));
    }

    #[test]
    fn test_identity_conversion_is_exact() {
        let rates = table();
        let mut conv = ConverterState::new("THB", "THB");
        conv.set_amount(123.456);

        // from == to : le résultat vaut exactement le montant
        assert_eq!(conv.result(&rates), Some(123.456));
    }

    #[test]
    fn test_zero_amount_is_zero_not_unknown() {
        let rates = table();
        let mut conv = ConverterState::new("USD", "THB");
        conv.set_amount(0.0);

        assert_eq!(conv.result(&rates), Some(0.0));
        assert_eq!(conv.result_display(&rates), "0.0000");
    }

    #[test]
    fn test_unknown_code_gives_unknown_sentinel() {
        let rates = table();
        let conv = ConverterState::new("USD", "XXX");

        // Code absent de la table : None, pas zéro, pas de panic
        assert_eq!(conv.result(&rates), None);
        assert_eq!(conv.result_display(&rates), "-");
    }

    #[test]
    fn test_empty_table_gives_unknown_sentinel() {
        let rates = RateTable::default();
        let conv = ConverterState::new("USD", "THB");
        assert_eq!(conv.result(&rates), None);
    }

    #[test]
    fn test_double_swap_restores_inputs() {
        let rates = table();
        let mut conv = ConverterState::new("USD", "THB");
        conv.set_amount(10.0);

        let before = conv.clone();
        let result_before = conv.result(&rates);

        conv.swap();
        assert_eq!(conv.from, "THB");
        assert_eq!(conv.to, "USD");

        conv.swap();
        assert_eq!(conv, before);
        assert_eq!(conv.result(&rates), result_before);
    }

    #[test]
    fn test_negative_amount_is_clamped() {
        let mut conv = ConverterState::new("USD", "THB");
        conv.set_amount(-5.0);
        assert_eq!(conv.amount, 0.0);
    }
}
