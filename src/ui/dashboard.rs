// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le tableau des taux, le panneau convertisseur et le footer en
// utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. List + ListState : tableau scrollable avec ligne sélectionnée
// 4. Style : couleurs pilotées par le thème courant (valeur explicite,
//    pas de global mutable)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::ui::chart;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern "State Machine" : un écran à la fois
/// - L'erreur fatale (taux non chargés) court-circuite tout le reste
pub fn render(frame: &mut Frame, app: &App) {
    if let Some(message) = &app.fatal_error {
        render_fatal_error(frame, app, message);
        return;
    }

    match app.screen {
        Screen::Table | Screen::Search | Screen::Amount => render_table_screen(frame, app),
        Screen::Chart => chart::render_chart(frame, app, frame.size()),
    }
}

/// Dessine l'écran principal : header, tableau, convertisseur, footer
fn render_table_screen(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_rate_table(frame, app, chunks[1]);
    render_converter(frame, app, chunks[2]);

    match app.screen {
        Screen::Search => render_search_footer(frame, app, chunks[3]),
        Screen::Amount => render_amount_footer(frame, app, chunks[3]),
        _ => render_footer(frame, app, chunks[3]),
    }
}

/// Crée le layout principal (header, tableau, convertisseur, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : titre + recherche active
            Constraint::Min(0),    // Tableau : tout le reste
            Constraint::Length(4), // Convertisseur
            Constraint::Length(3), // Footer : raccourcis / statut
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

/// Dessine le header : titre localisé + filtre de recherche courant
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    let theme = app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()))
        .title(format!(" {} WorldRates ", labels.flag))
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        labels.title,
        Style::default()
            .fg(theme.accent())
            .add_modifier(Modifier::BOLD),
    )];

    if !app.search.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("🔍 {}", app.search),
            Style::default().fg(theme.rate()),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tableau des taux
// ============================================================================

/// Tronque un nom de pays pour la colonne (largeur fixe)
fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max - 1).collect();
        format!("{}…", truncated)
    }
}

/// Dessine le tableau des lignes visibles
///
/// Une ligne par paire (devise, pays), dans l'ordre du rate provider.
/// La sélection est gérée par ListState : le widget scrolle tout seul.
fn render_rate_table(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    let theme = app.theme;

    let title = format!(" {} ({}) ", labels.col_currency, app.rows.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()))
        .title(title);

    if app.rows.is_empty() {
        // Soit les lookups ne sont pas encore arrivés, soit le filtre ne
        // matche rien
        let message = if app.resolver_done || !app.search.is_empty() {
            labels.no_data.to_string()
        } else {
            format!("⏳ {}/{}", app.resolved_count, app.rates.len())
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(theme.dim()))),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    // En-tête de colonnes : premier item de la List (non sélectionnable,
    // la sélection commence à l'index 1)
    let header = format!(
        "   #  {:<6} {:<28} {:^4} {:>14}",
        labels.col_currency, labels.col_country, labels.col_flag, labels.col_rate
    );
    let mut items: Vec<ListItem> = vec![ListItem::new(header).style(
        Style::default()
            .fg(theme.dim())
            .add_modifier(Modifier::BOLD),
    )];

    items.extend(app.rows.iter().enumerate().map(|(index, row)| {
        let flag = row.flag.as_deref().unwrap_or(" ");
        let line = format!(
            " {:>3}  {:<6} {:<28} {:^4} {:>14.4}",
            index + 1,
            row.code,
            truncate(&row.country, 28),
            flag,
            row.rate
        );
        ListItem::new(line).style(Style::default().fg(theme.fg()))
    }));

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    // ListState local : la sélection vit dans App, le widget ne fait que
    // la refléter (et calcule l'offset de scroll). +1 pour l'en-tête.
    let mut state = ListState::default();
    state.select(Some(app.selected_index + 1));
    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Convertisseur
// ============================================================================

/// Dessine le panneau convertisseur
///
/// Le résultat est recalculé à chaque rendu depuis (montant, from, to, taux) :
/// "-" tant que l'un des deux taux est inconnu.
fn render_converter(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    let theme = app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()))
        .title(format!(" 💱 {} ", labels.converter));

    let result = app.converter.result_display(&app.rates);

    let conversion_line = Line::from(vec![
        Span::styled(
            format!("{} ", app.converter.amount),
            Style::default().fg(theme.fg()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.converter.from.clone(),
            Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" → ", Style::default().fg(theme.dim())),
        Span::styled(
            app.converter.to.clone(),
            Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} = ", labels.result),
            Style::default().fg(theme.dim()),
        ),
        Span::styled(
            format!("{} {}", result, app.converter.to),
            Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[c]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::styled(" Amount  ", Style::default().fg(theme.dim())),
        Span::styled("[f]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}  ", labels.from), Style::default().fg(theme.dim())),
        Span::styled("[t]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}  ", labels.to), Style::default().fg(theme.dim())),
        Span::styled("[s]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}", labels.swap), Style::default().fg(theme.dim())),
    ]);

    let paragraph = Paragraph::new(vec![conversion_line, help_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer
// ============================================================================

/// Dessine le footer : statut, confirmation de quit, ou raccourcis
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()));

    let line = if app.is_awaiting_quit_confirmation() {
        // Message de confirmation de quit (two-step)
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(ratatui::style::Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(status) = &app.status {
        // Résultat d'un export (éphémère)
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD),
        ))
    } else if !app.resolver_done {
        // Les lookups pays arrivent encore : progression
        Line::from(Span::styled(
            format!("⏳ {}/{}", app.resolved_count, app.rates.len()),
            Style::default().fg(theme.dim()),
        ))
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓/jk]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Nav  "),
            Span::styled("[/]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Search  "),
            Span::styled("[Enter]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Chart  "),
            Span::styled("[e/x/p]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Export  "),
            Span::styled("[L]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Lang  "),
            Span::styled("[d]", Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD)),
            Span::raw(" Theme"),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer en mode recherche avec la ligne de saisie
///
/// Le filtre s'applique en direct : le tableau au-dessus se met à jour à
/// chaque caractère
fn render_search_footer(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    render_input_footer(frame, app, area, &format!("🔍 {} ", labels.search), &app.search);
}

/// Dessine le footer en mode saisie du montant
fn render_amount_footer(frame: &mut Frame, app: &App, area: Rect) {
    let labels = app.lang.labels();
    let prompt = format!("{} ({} → {}): ", labels.converter, app.converter.from, app.converter.to);
    render_input_footer(frame, app, area, &prompt, &app.amount_input);
}

/// Footer générique de saisie : prompt + buffer + curseur bloc
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect, prompt: &str, buffer: &str) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ratatui::style::Color::Green)); // Vert = mode saisie

    let input_line = Line::from(vec![
        Span::styled(
            prompt.to_string(),
            Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(buffer.to_string(), Style::default().fg(theme.fg())),
        Span::styled(
            "█", // Curseur
            Style::default().fg(theme.fg()).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled(
            "[Enter]",
            Style::default().fg(ratatui::style::Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Confirm  "),
        Span::styled(
            "[ESC]",
            Style::default().fg(ratatui::style::Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Erreur fatale
// ============================================================================

/// Dessine l'écran d'erreur pleine page (fetch des taux échoué)
///
/// Rien d'autre ne peut s'afficher sans la table des taux : message
/// bloquant, pas de retry, seule issue [q]
fn render_fatal_error(frame: &mut Frame, app: &App, message: &str) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ratatui::style::Color::Red))
        .title(" WorldRates ")
        .title_alignment(Alignment::Center);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✖ Impossible de charger les taux de change",
            Style::default()
                .fg(ratatui::style::Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[q]",
                Style::default().fg(theme.rate()).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Quit"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, frame.size());
}
