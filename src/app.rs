// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Recompute explicite : refresh_rows() recalcule la vue après chaque
//    changement d'entrée, au lieu de déclencheurs en cascade
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état : les lignes visibles sont toujours
//   dérivées de (taux, pays, recherche) au moment de la mutation
// ============================================================================

use std::collections::HashMap;

use crate::api::{HistoryRange, HistorySeries};
use crate::i18n::{Lang, Theme};
use crate::models::{visible_rows, ConverterState, CountryEntry, DisplayRow, RateTable};

/// Devise cible par défaut du convertisseur
const DEFAULT_TARGET: &str = "THB";

/// Nombre de ticks avant disparition d'un message de statut
const STATUS_TICKS: u8 = 20;

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : tableau des taux + convertisseur
    Table,

    /// Vue graphique : historique du taux from -> to
    Chart,

    /// Mode saisie : filtre de recherche (appliqué en direct)
    Search,

    /// Mode saisie : montant du convertisseur
    Amount,
}

/// État principal de l'application
///
/// Toute la session tient ici : rien ne survit à la fin du process.
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub screen: Screen,

    /// Erreur fatale : le fetch des taux a échoué, rien d'autre ne peut
    /// s'afficher (écran d'erreur pleine page, pas de retry)
    pub fatal_error: Option<String>,

    /// Table des taux (remplacée en bloc à chaque fetch réussi)
    pub rates: RateTable,

    /// Résultats du resolver de pays, par code de devise
    /// CONCEPT : settlement incrémental
    /// - Code absent de la map : lookup pas encore settled
    /// - Vec vide : settled, aucun pays qualifiant
    /// - Vec d'entrées : settled (placeholder inclus en cas d'échec)
    pub countries: HashMap<String, Vec<CountryEntry>>,

    /// Nombre de lookups pays settled (pour la barre de progression)
    pub resolved_count: usize,

    /// Tous les lookups pays ont settled (barrière de jointure franchie)
    pub resolver_done: bool,

    /// Filtre de recherche courant (sous-chaîne, insensible à la casse)
    pub search: String,

    /// Lignes visibles, dérivées de (rates, countries, search)
    /// Recalculées par refresh_rows() après chaque mutation d'une entrée
    pub rows: Vec<DisplayRow>,

    /// Index de la ligne sélectionnée dans le tableau
    pub selected_index: usize,

    /// État du convertisseur (montant, from, to)
    pub converter: ConverterState,

    /// Buffer de saisie du montant (mode Amount)
    pub amount_input: String,

    /// Série historique chargée pour le graphique
    pub history: Option<HistorySeries>,

    /// Échec du chargement de l'historique (le graphique affiche "no data")
    pub history_error: bool,

    /// Chargement de l'historique en cours
    pub history_loading: bool,

    /// Période du graphique historique
    pub history_range: HistoryRange,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    /// Message de statut éphémère (résultat d'un export)
    pub status: Option<String>,

    /// Ticks restants avant effacement du statut
    status_ticks: u8,

    /// Langue de l'interface
    pub lang: Lang,

    /// Thème de couleurs
    pub theme: Theme,
}

impl App {
    /// Crée l'application avec une table de taux chargée
    pub fn new(rates: RateTable) -> Self {
        let converter = ConverterState::new(rates.base(), DEFAULT_TARGET);
        Self {
            running: true,
            screen: Screen::Table,
            fatal_error: None,
            rates,
            countries: HashMap::new(),
            resolved_count: 0,
            resolver_done: false,
            search: String::new(),
            rows: Vec::new(),
            selected_index: 0,
            converter,
            amount_input: String::new(),
            history: None,
            history_error: false,
            history_loading: false,
            history_range: HistoryRange::default(),
            confirm_quit: false,
            status: None,
            status_ticks: 0,
            lang: Lang::default(),
            theme: Theme::default(),
        }
    }

    /// Crée l'application en état d'erreur fatale (fetch des taux échoué)
    pub fn with_error(message: String) -> Self {
        let mut app = Self::new(RateTable::default());
        app.fatal_error = Some(message);
        app
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Vue dérivée
    // ========================================================================

    /// Recalcule les lignes visibles
    ///
    /// CONCEPT : recompute pur et explicite
    /// - Appelé après chaque mutation de rates / countries / search
    /// - Mêmes entrées => même séquence : le rendu ne fait que lire rows
    /// - L'index sélectionné est re-borné sur la nouvelle longueur
    pub fn refresh_rows(&mut self) {
        self.rows = visible_rows(&self.rates, &self.countries, &self.search);
        let max_index = self.rows.len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);
    }

    /// Retourne la ligne sélectionnée
    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.selected_index)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigue vers le haut dans le tableau
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() : soustrait mais ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans le tableau
    pub fn navigate_down(&mut self) {
        let max_index = self.rows.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    // ========================================================================
    // Écrans
    // ========================================================================

    pub fn show_table(&mut self) {
        self.screen = Screen::Table;
    }

    pub fn show_chart(&mut self) {
        self.screen = Screen::Chart;
    }

    pub fn is_on_table(&self) -> bool {
        self.screen == Screen::Table
    }

    pub fn is_on_chart(&self) -> bool {
        self.screen == Screen::Chart
    }

    pub fn is_in_search_mode(&self) -> bool {
        self.screen == Screen::Search
    }

    pub fn is_in_amount_mode(&self) -> bool {
        self.screen == Screen::Amount
    }

    // ========================================================================
    // Resolver de pays (settlement incrémental)
    // ========================================================================

    /// Applique le résultat settled d'un lookup pays
    ///
    /// Appelé sur le thread UI uniquement : chaque settlement est appliqué
    /// atomiquement (map + recompute) avant le rendu suivant, la vue ne
    /// montre jamais une mise à jour à moitié appliquée.
    pub fn apply_country_result(&mut self, code: String, entries: Vec<CountryEntry>) {
        self.countries.insert(code, entries);
        self.resolved_count += 1;
        self.refresh_rows();
    }

    /// Tous les lookups ont settled (succès, vide ou placeholder)
    pub fn finish_resolver(&mut self) {
        self.resolver_done = true;
    }

    // ========================================================================
    // Recherche (appliquée en direct pendant la saisie)
    // ========================================================================

    /// Entre en mode recherche (le filtre courant reste affiché et éditable)
    pub fn start_search(&mut self) {
        self.screen = Screen::Search;
    }

    /// Valide la recherche et retourne au tableau (le filtre reste actif)
    pub fn submit_search(&mut self) {
        self.screen = Screen::Table;
    }

    /// Annule la recherche : efface le filtre et retourne au tableau
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.screen = Screen::Table;
        self.refresh_rows();
    }

    /// Ajoute un caractère au filtre (recalcul immédiat de la vue)
    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.refresh_rows();
    }

    /// Supprime le dernier caractère du filtre
    pub fn search_pop(&mut self) {
        self.search.pop();
        self.refresh_rows();
    }

    // ========================================================================
    // Convertisseur
    // ========================================================================

    /// Entre en mode saisie du montant
    pub fn start_amount(&mut self) {
        self.amount_input.clear();
        self.screen = Screen::Amount;
    }

    /// Annule la saisie du montant
    pub fn cancel_amount(&mut self) {
        self.amount_input.clear();
        self.screen = Screen::Table;
    }

    /// Valide la saisie du montant
    ///
    /// Saisie vide ou non numérique : le montant courant est conservé.
    /// Le parsing n'accepte que chiffres et point, donc jamais de négatif.
    pub fn submit_amount(&mut self) {
        if let Ok(amount) = self.amount_input.parse::<f64>() {
            self.converter.set_amount(amount);
        }
        self.amount_input.clear();
        self.screen = Screen::Table;
    }

    pub fn amount_push(&mut self, c: char) {
        self.amount_input.push(c);
    }

    pub fn amount_pop(&mut self) {
        self.amount_input.pop();
    }

    /// Utilise la devise de la ligne sélectionnée comme source
    pub fn set_from_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            let code = row.code.clone();
            self.converter.set_from(&code);
        }
    }

    /// Utilise la devise de la ligne sélectionnée comme cible
    pub fn set_to_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            let code = row.code.clone();
            self.converter.set_to(&code);
        }
    }

    /// Échange source et cible du convertisseur
    pub fn swap_converter(&mut self) {
        self.converter.swap();
    }

    // ========================================================================
    // Historique
    // ========================================================================

    /// Démarre un chargement d'historique (la série précédente reste affichée)
    pub fn begin_history_load(&mut self) {
        self.history_loading = true;
        self.history_error = false;
    }

    pub fn set_history(&mut self, series: HistorySeries) {
        self.history = Some(series);
        self.history_loading = false;
        self.history_error = false;
    }

    /// Échec de l'historique : ne dégrade que le panneau graphique
    pub fn set_history_error(&mut self) {
        self.history = None;
        self.history_loading = false;
        self.history_error = true;
    }

    pub fn next_range(&mut self) {
        self.history_range = self.history_range.next();
    }

    pub fn previous_range(&mut self) {
        self.history_range = self.history_range.previous();
    }

    // ========================================================================
    // Quit two-step
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Statut, langue, thème
    // ========================================================================

    /// Affiche un message de statut éphémère (résultat d'un export)
    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
        self.status_ticks = STATUS_TICKS;
    }

    /// Langue suivante (les libellés changent, les données restent)
    pub fn cycle_lang(&mut self) {
        self.lang = self.lang.next();
    }

    /// Bascule le thème clair/sombre
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - Permet de mettre à jour l'état même sans événement utilisateur
    /// - Ici : expiration du message de statut
    pub fn tick(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }
}

// ============================================================================
// Tests unitaires
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
                ("EUR".to_string(), 0.92),
            ],
        )
        .unwrap()
    }

    fn entry(name: &str) -> CountryEntry {
        CountryEntry::new(name.to_string(), None, None)
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(rates());
        assert!(app.is_running());
        assert!(app.rows.is_empty()); // aucun lookup settled pour l'instant
        assert_eq!(app.converter.from, "USD");
        assert_eq!(app.converter.to, "THB");
        assert!(!app.resolver_done);
    }

    #[test]
    fn test_app_with_error() {
        let app = App::with_error("boom".to_string());
        assert!(app.is_running());
        assert_eq!(app.fatal_error.as_deref(), Some("boom"));
        assert!(app.rates.is_empty());
    }

    #[test]
    fn test_incremental_settlement_updates_rows() {
        let mut app = App::new(rates());

        // Les résultats arrivent dans le désordre : la vue suit l'ordre
        // du rate provider quand même
        app.apply_country_result("THB".to_string(), vec![entry("Thailand")]);
        assert_eq!(app.rows.len(), 1);

        app.apply_country_result("USD".to_string(), vec![entry("United States")]);
        assert_eq!(app.rows.len(), 2);
        assert_eq!(app.rows[0].code, "USD");
        assert_eq!(app.rows[1].code, "THB");

        app.apply_country_result("EUR".to_string(), vec![]);
        assert_eq!(app.resolved_count, 3);
        app.finish_resolver();
        assert!(app.resolver_done);
        assert_eq!(app.rows.len(), 2); // EUR settled sans pays : absent
    }

    #[test]
    fn test_navigation_is_clamped_to_rows() {
        let mut app = App::new(rates());
        app.apply_country_result("USD".to_string(), vec![entry("United States")]);
        app.apply_country_result("THB".to_string(), vec![entry("Thailand")]);

        assert_eq!(app.selected_index, 0);
        app.navigate_down();
        assert_eq!(app.selected_index, 1);
        app.navigate_down(); // déjà en bas
        assert_eq!(app.selected_index, 1);
        app.navigate_up();
        app.navigate_up(); // déjà en haut
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_search_filters_live_and_clamps_selection() {
        let mut app = App::new(rates());
        app.apply_country_result("USD".to_string(), vec![entry("United States")]);
        app.apply_country_result("THB".to_string(), vec![entry("Thailand")]);
        app.navigate_down(); // sélectionne THB

        app.start_search();
        app.search_push('u');
        app.search_push('s');
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.rows[0].code, "USD");
        assert_eq!(app.selected_index, 0); // re-borné

        app.cancel_search();
        assert!(app.search.is_empty());
        assert_eq!(app.rows.len(), 2);
    }

    #[test]
    fn test_converter_picks_from_selected_row() {
        let mut app = App::new(rates());
        app.apply_country_result("USD".to_string(), vec![entry("United States")]);
        app.apply_country_result("THB".to_string(), vec![entry("Thailand")]);

        app.navigate_down();
        app.set_from_selected();
        assert_eq!(app.converter.from, "THB");
        app.set_to_selected();
        assert_eq!(app.converter.to, "THB");
    }

    #[test]
    fn test_amount_submit_parses_input() {
        let mut app = App::new(rates());
        app.start_amount();
        assert!(app.is_in_amount_mode());

        app.amount_push('1');
        app.amount_push('0');
        app.amount_push('.');
        app.amount_push('5');
        app.submit_amount();

        assert_eq!(app.converter.amount, 10.5);
        assert!(app.is_on_table());
    }

    #[test]
    fn test_invalid_amount_keeps_previous_value() {
        let mut app = App::new(rates());
        app.converter.set_amount(7.0);
        app.start_amount();
        app.amount_push('.');
        app.amount_push('.');
        app.submit_amount();
        assert_eq!(app.converter.amount, 7.0);
    }

    #[test]
    fn test_status_expires_after_ticks() {
        let mut app = App::new(rates());
        app.set_status("Export OK".to_string());
        assert!(app.status.is_some());

        for _ in 0..STATUS_TICKS {
            app.tick();
        }
        assert!(app.status.is_none());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new(rates());
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        assert!(app.is_running());
    }
}
