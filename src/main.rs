// ============================================================================
// WorldRates - Visionneuse de taux de change dans le terminal
// ============================================================================
// Programme TUI : tableau des taux mondiaux, convertisseur de devises,
// graphique historique, exports CSV/Excel/PDF/PNG
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour appels API
// 4. Fan-out concurrent : un task par devise pour les lookups pays,
//    avec barrière de jointure (CountriesDone)
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use worldrates::api::{fetch_history, fetch_latest_rates, resolve_country};
use worldrates::api::{HistoryRange, HistorySeries};
use worldrates::app::App;
use worldrates::export;
use worldrates::i18n::Lang;
use worldrates::models::CountryEntry;
use worldrates::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les tâches async (fetch API)
// - Communication via mpsc channels (multi-producer, single-consumer)
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// Lancer les lookups pays pour tous les codes, en parallèle
    /// Un task par code ; chaque échec est isolé (placeholder)
    ResolveCountries { codes: Vec<String>, lang: Lang },

    /// Charger l'historique d'un taux from -> to sur une période
    LoadHistory {
        from: String,
        to: String,
        range: HistoryRange,
    },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Un lookup pays a settled (succès, vide, ou placeholder après échec)
    CountryResolved {
        code: String,
        entries: Vec<CountryEntry>,
    },

    /// Tous les lookups pays ont settled (barrière de jointure franchie)
    CountriesDone,

    /// Historique chargé avec succès
    HistoryLoaded { series: HistorySeries },

    /// Échec de l'historique : le graphique passe en "no data"
    HistoryFailed,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans ./logs/worldrates.log (rotation quotidienne).
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f logs/worldrates.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=worldrates=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "worldrates.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour worldrates, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worldrates=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("WorldRates starting up");
    println!("💱 Chargement des taux de change...\n");

    // Fetch bloquant de la table des taux AVANT d'entrer dans le TUI
    // CONCEPT : Async dans sync
    // - Un seul appel, pas de retry : en cas d'échec on affiche l'écran
    //   d'erreur pleine page (rien d'autre ne peut se rendre sans les taux)
    let runtime = tokio::runtime::Runtime::new()?;
    let app = match runtime.block_on(fetch_latest_rates()) {
        Ok(rates) => {
            info!(currencies = rates.len(), "Rate table loaded");
            println!("✅ {} devises chargées !\n", rates.len());
            App::new(rates)
        }
        Err(e) => {
            error!(error = ?e, "Failed to load rate table");
            App::with_error(e.to_string())
        }
    };

    // Les lookups pays sont lancés une fois le TUI démarré : l'utilisateur
    // peut déjà utiliser le convertisseur pendant qu'ils arrivent
    let codes: Vec<String> = app.rates.codes().to_vec();
    let lang = app.lang;
    let has_rates = app.fatal_error.is_none();

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Permet au worker thread et à l'UI d'accéder à App
    let app = Arc::new(Mutex::new(app));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx);

    if has_rates {
        let _ = command_tx.send(AppCommand::ResolveCountries { codes, lang });
    }

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui traite les commandes async
// - Reçoit des AppCommand via un channel (command_rx)
// - Envoie des AppResult via un autre channel (result_tx)
// - Permet de faire des appels API sans bloquer l'UI
// ============================================================================

/// Worker thread qui exécute les tâches async en arrière-plan
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        // CONCEPT : Runtime per-thread
        // - Permet d'exécuter du code async dans un thread standard
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create worker tokio runtime");
                return;
            }
        };

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::ResolveCountries { codes, lang } => {
                            // CONCEPT : Fan-out task-per-key + barrière
                            // - Un tokio task par code, tous concurrents
                            // - Chaque task envoie son résultat settled dès
                            //   qu'il l'a (l'UI se met à jour au fil de l'eau)
                            // - CountriesDone part après la jointure complète
                            runtime.block_on(async {
                                let handles: Vec<_> = codes
                                    .into_iter()
                                    .map(|code| {
                                        let tx = result_tx.clone();
                                        tokio::spawn(async move {
                                            // resolve_country n'échoue jamais :
                                            // un échec devient un placeholder
                                            let entries = resolve_country(&code, lang).await;
                                            let _ = tx.send(AppResult::CountryResolved {
                                                code,
                                                entries,
                                            });
                                        })
                                    })
                                    .collect();

                                for handle in handles {
                                    if let Err(e) = handle.await {
                                        warn!(error = ?e, "Country lookup task panicked");
                                    }
                                }
                            });

                            info!("All country lookups settled");
                            let _ = result_tx.send(AppResult::CountriesDone);
                        }

                        AppCommand::LoadHistory { from, to, range } => {
                            let result = runtime
                                .block_on(async { fetch_history(&from, &to, range).await });

                            match result {
                                Ok(series) => {
                                    let _ = result_tx.send(AppResult::HistoryLoaded { series });
                                }
                                Err(e) => {
                                    // Ne dégrade que le panneau graphique
                                    warn!(from = %from, to = %to, error = ?e, "History fetch failed");
                                    let _ = result_tx.send(AppResult::HistoryFailed);
                                }
                            }
                        }
                    }
                }
                Err(_) => {
                    // Channel fermé, on quitte
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Event Loop Pattern
// - À chaque itération : résultats du worker, render, input, update
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 0. RÉSULTATS : Draine les résultats du worker
        // ========================================
        // CONCEPT : Non-blocking drain avec try_recv
        // - On vide tout ce qui est arrivé depuis la dernière itération :
        //   les ~160 lookups pays settlent bien plus vite que la boucle
        // - Chaque settlement est appliqué atomiquement sous le lock,
        //   la vue rendue ensuite est toujours cohérente
        {
            let mut app_lock = app.lock().unwrap();
            while let Ok(result) = result_rx.try_recv() {
                match result {
                    AppResult::CountryResolved { code, entries } => {
                        debug!(code = %code, countries = entries.len(), "Applying settled lookup");
                        app_lock.apply_country_result(code, entries);
                    }
                    AppResult::CountriesDone => {
                        info!(rows = app_lock.rows.len(), "Country resolver done");
                        app_lock.finish_resolver();
                    }
                    AppResult::HistoryLoaded { series } => {
                        info!(points = series.points.len(), "Updating history series");
                        app_lock.set_history(series);
                    }
                    AppResult::HistoryFailed => {
                        app_lock.set_history_error();
                    }
                }
            }
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        match events.next() {
            Ok(event) => {
                let mut app_lock = app.lock().unwrap();
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(_) => {
                // Erreur lors de la lecture d'événement
            }
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT : Event Handler Pattern
// - Sépare la logique de gestion des événements
// - Guards sur l'écran courant : une touche n'agit que dans son contexte
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: worldrates::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use worldrates::ui::events::{
        get_char_from_event, is_amount_char_event, is_amount_event, is_backspace_event,
        is_down_event, is_enter_event, is_escape_event, is_export_csv_event,
        is_export_excel_event, is_export_image_event, is_export_pdf_event, is_from_event,
        is_lang_event, is_next_range_event, is_previous_range_event, is_quit_event,
        is_search_char_event, is_search_event, is_space_event, is_swap_event, is_theme_event,
        is_to_event, is_up_event, Event,
    };

    let in_input_mode = app.is_in_search_mode() || app.is_in_amount_mode();

    match event {
        // Touche 'q' : quit two-step (hors modes de saisie, où 'q' est un
        // caractère comme un autre)
        Event::Key(_) if is_quit_event(&event) && !in_input_mode => {
            if app.fatal_error.is_some() {
                // Écran d'erreur fatale : une seule pression suffit
                info!("User quit from fatal error screen");
                app.quit();
            } else if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // ========================================
        // Mode recherche : saisie du filtre (appliqué en direct)
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_search_mode() => {
            info!("User cancelled search");
            app.cancel_search();
        }
        Event::Key(_) if is_enter_event(&event) && app.is_in_search_mode() => {
            info!(query = %app.search, "User submitted search");
            app.submit_search();
        }
        Event::Key(_) if is_backspace_event(&event) && app.is_in_search_mode() => {
            app.search_pop();
        }
        Event::Key(_) if is_search_char_event(&event) && app.is_in_search_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.search_push(c);
            }
        }

        // ========================================
        // Mode montant : saisie du montant du convertisseur
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_amount_mode() => {
            app.cancel_amount();
        }
        Event::Key(_) if is_enter_event(&event) && app.is_in_amount_mode() => {
            app.submit_amount();
            info!(amount = app.converter.amount, "User set converter amount");
        }
        Event::Key(_) if is_backspace_event(&event) && app.is_in_amount_mode() => {
            app.amount_pop();
        }
        Event::Key(_) if is_amount_char_event(&event) && app.is_in_amount_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.amount_push(c);
            }
        }

        // ========================================
        // Tableau : navigation, recherche, convertisseur, exports
        // ========================================
        Event::Key(_) if is_up_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.navigate_down();
        }
        Event::Key(_) if is_search_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            debug!("User entered search mode");
            app.start_search();
        }
        Event::Key(_) if is_amount_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.start_amount();
        }
        Event::Key(_) if is_from_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.set_from_selected();
            info!(from = %app.converter.from, "User set converter source");
        }
        Event::Key(_) if is_to_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.set_to_selected();
            info!(to = %app.converter.to, "User set converter target");
        }
        Event::Key(_) if is_swap_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            app.swap_converter();
            info!(from = %app.converter.from, to = %app.converter.to, "User swapped converter");
        }

        // Enter : ouvre le graphique historique du taux from -> to
        Event::Key(_) if is_enter_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            info!(from = %app.converter.from, to = %app.converter.to, "User opened chart view");
            app.show_chart();
            request_history(app, command_tx);
        }

        // Exports du tableau visible (déjà filtré, dans l'ordre affiché)
        Event::Key(_) if is_export_csv_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            let path = PathBuf::from(export::CSV_FILENAME);
            let result = export::export_csv(&app.rows, &path);
            report_export(app, result, export::CSV_FILENAME);
        }
        Event::Key(_) if is_export_excel_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            let path = PathBuf::from(export::EXCEL_FILENAME);
            let result = export::export_excel(&app.rows, &path);
            report_export(app, result, export::EXCEL_FILENAME);
        }
        Event::Key(_) if is_export_pdf_event(&event) && app.is_on_table() => {
            app.cancel_quit();
            let path = PathBuf::from(export::PDF_FILENAME);
            let result = export::export_pdf(&app.rows, &path);
            report_export(app, result, export::PDF_FILENAME);
        }

        // ========================================
        // Graphique : retour, période, export PNG
        // ========================================
        Event::Key(_) if (is_escape_event(&event) || is_space_event(&event)) && app.is_on_chart() => {
            app.cancel_quit();
            debug!("User returned to table");
            app.show_table();
        }
        Event::Key(_) if is_next_range_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.next_range();
            info!(range = ?app.history_range, "User changed to next range");
            request_history(app, command_tx);
        }
        Event::Key(_) if is_previous_range_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.previous_range();
            info!(range = ?app.history_range, "User changed to previous range");
            request_history(app, command_tx);
        }
        Event::Key(_) if is_export_image_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            match &app.history {
                Some(series) => {
                    let path = PathBuf::from(export::PNG_FILENAME);
                    let result = export::export_chart_png(series, app.theme, &path);
                    report_export(app, result, export::PNG_FILENAME);
                }
                None => {
                    app.set_status("✖ No chart data to export".to_string());
                }
            }
        }

        // ========================================
        // Langue et thème (valables sur tableau et graphique)
        // ========================================
        Event::Key(_) if is_lang_event(&event) && !in_input_mode => {
            app.cancel_quit();
            app.cycle_lang();
            info!(lang = ?app.lang, "User changed language");
        }
        Event::Key(_) if is_theme_event(&event) && !in_input_mode => {
            app.cancel_quit();
            app.toggle_theme();
            info!(theme = ?app.theme, "User toggled theme");
        }

        Event::Tick => {
            // Tick régulier : l'expiration des statuts est gérée par
            // app.tick() dans la boucle principale
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        _ => {
            // Autres événements : ignorés
        }
    }
}

/// Envoie la commande de chargement de l'historique pour la paire courante
fn request_history(app: &mut App, command_tx: &mpsc::Sender<AppCommand>) {
    app.begin_history_load();
    let _ = command_tx.send(AppCommand::LoadHistory {
        from: app.converter.from.clone(),
        to: app.converter.to.clone(),
        range: app.history_range,
    });
}

/// Transforme le résultat d'un export en message de statut
///
/// Un échec d'export n'interrompt rien : il s'affiche dans la barre de
/// statut et disparaît tout seul.
fn report_export(app: &mut App, result: Result<()>, filename: &str) {
    match result {
        Ok(()) => {
            info!(file = filename, "Export succeeded");
            app.set_status(format!("✔ {}", filename));
        }
        Err(e) => {
            error!(file = filename, error = ?e, "Export failed");
            app.set_status(format!("✖ {}: {}", filename, e));
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// CONCEPT RUST : Terminal raw mode
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
///
/// Appelé dans main() même en cas d'erreur, pour ne pas laisser le
/// terminal cassé
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
