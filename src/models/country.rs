// ============================================================================
// Structure : CountryEntry
// ============================================================================
// Un pays associé à une devise : nom affichable + drapeau
//
// CONCEPTS RUST :
// 1. Option : le drapeau peut manquer
// 2. Constructeurs nommés : new() / placeholder()
//
// Une devise peut avoir zéro, un ou plusieurs pays associés :
// - Vec vide : aucun pays qualifiant (la devise n'apparaît pas dans le tableau)
// - Vec de N entrées : N lignes dans le tableau
// - placeholder() : le lookup a échoué, on affiche "-" pour cette devise
// ============================================================================

/// Nom affiché par le placeholder quand le lookup d'un pays a échoué
pub const PLACEHOLDER_NAME: &str = "-";

/// Un pays attribué à une devise
#[derive(Debug, Clone, PartialEq)]
pub struct CountryEntry {
    /// Nom affichable (traduction localisée si disponible, sinon nom commun)
    pub name: String,

    /// Drapeau emoji (ex: "🇹🇭"), pour l'affichage dans le terminal
    pub flag: Option<String>,

    /// URL de l'image du drapeau (PNG préféré, sinon SVG), pour les exports
    pub flag_url: Option<String>,
}

impl CountryEntry {
    pub fn new(name: String, flag: Option<String>, flag_url: Option<String>) -> Self {
        Self {
            name,
            flag,
            flag_url,
        }
    }

    /// Entrée placeholder utilisée quand le provider n'a rien renvoyé du tout
    /// (échec réseau ou payload illisible) pour cette devise
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            flag: None,
            flag_url: None,
        }
    }

    /// Vérifie si cette entrée est le placeholder d'échec
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME && self.flag.is_none() && self.flag_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let entry = CountryEntry::placeholder();
        assert_eq!(entry.name, "-");
        assert!(entry.flag.is_none());
        assert!(entry.flag_url.is_none());
        assert!(entry.is_placeholder());
    }

    #[test]
    fn test_regular_entry_is_not_placeholder() {
        let entry = CountryEntry::new(
            "Thailand".to_string(),
            Some("🇹🇭".to_string()),
            Some("https://flagcdn.com/w320/th.png".to_string()),
        );
        assert!(!entry.is_placeholder());
    }
}
