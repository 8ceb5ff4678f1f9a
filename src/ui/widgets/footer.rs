//! Footer widget with context-aware keybinding hints

use crate::app::App;
use crate::state::{InputMode, Tab};
use crate::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render footer with shortcuts for the current mode and tab
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    render_hints(frame, area, &hints_for(app));
}

fn hints_for(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.show_action_menu {
        return vec![("↑↓", "Select"), ("Enter", "Run"), ("Esc", "Close")];
    }

    match app.input_mode {
        InputMode::Search { .. } => return vec![("Enter", "Search"), ("Esc", "Cancel")],
        InputMode::EditSetting { .. } => return vec![("Enter", "Save"), ("Esc", "Cancel")],
        InputMode::Login { .. } => {
            return vec![("Tab", "Next field"), ("Enter", "Submit"), ("Esc", "Cancel")];
        }
        InputMode::Prompt { .. } => return vec![("Enter", "OK"), ("Esc", "Cancel")],
        InputMode::Confirm { .. } => return vec![("y", "Yes"), ("n", "No")],
        InputMode::Viewer { .. } => {
            return vec![("↑↓", "Scroll"), ("g", "Top"), ("G", "End"), ("Esc", "Close")];
        }
        InputMode::Normal => {}
    }

    let mut hints = match app.active_tab {
        Tab::Main => vec![
            (
                "c",
                if app.connection_state.is_connected() {
                    "Disconnect"
                } else {
                    "Connect"
                },
            ),
            ("f", "Fastest"),
            ("r", "Refresh"),
            ("j/k", "Scroll log"),
        ],
        Tab::Locations => vec![
            ("Enter", "Connect"),
            ("/", "Search"),
            ("i/n/t/p", "Sort"),
            ("r", "Reload"),
        ],
        Tab::Settings => vec![("↑↓", "Field"), ("Enter", "Edit"), ("a", "Apply"), ("r", "Reload")],
        Tab::Exclusions => vec![
            ("a", "Add"),
            ("d", "Remove"),
            ("C", "Clear"),
            ("m", "Mode"),
            ("Enter", "Apply mode"),
        ],
        Tab::About => vec![("u", "Update"), ("e", "Export logs"), ("L", "License"), ("p", "CLI path")],
    };

    hints.extend_from_slice(&[("Tab", "Switch"), ("x", "Actions"), ("q", "Quit")]);
    hints
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    use ratatui::layout::{Constraint, Layout};

    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Hints (left)
            Constraint::Length(20), // Branding (right)
        ])
        .split(area);

    // 1. Render hints on the left
    let mut hint_spans = Vec::new();
    let mut current_width = 0;
    let max_width = chunks[0].width as usize;

    hint_spans.push(Span::raw(" "));
    current_width += 1;

    for (i, (key, action)) in hints.iter().enumerate() {
        // Calculate item width: "key" + " " + "action" + " | " (separator)
        // Separator is 3 chars " | " for i > 0
        let sep_width = if i > 0 { 3 } else { 0 };
        let item_width = key.len() + 1 + action.len() + sep_width;

        if current_width + item_width > max_width {
            break;
        }

        if i > 0 {
            hint_spans.push(Span::styled(" │ ", Style::default().fg(theme::PANEL_DARK)));
        }
        hint_spans.push(Span::styled(
            *key,
            Style::default()
                .fg(theme::ACCENT_KEY)
                .add_modifier(Modifier::BOLD),
        ));
        hint_spans.push(Span::raw(" "));
        hint_spans.push(Span::styled(*action, Style::default().fg(theme::TEXT_SECONDARY)));

        current_width += item_width;
    }
    frame.render_widget(Paragraph::new(Line::from(hint_spans)), chunks[0]);

    // 2. Render branding on the right
    let branding = Line::from(vec![Span::styled(
        format!(
            "{} v{} ",
            crate::constants::APP_NAME,
            crate::constants::APP_VERSION
        ),
        Style::default().fg(theme::TEXT_SECONDARY),
    )]);
    frame.render_widget(
        Paragraph::new(branding).alignment(ratatui::layout::Alignment::Right),
        chunks[1],
    );
}
