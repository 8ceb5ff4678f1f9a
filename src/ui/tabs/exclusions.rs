//! Exclusions tab: site list and the exclusion mode.

use super::panel;
use crate::app::App;
use crate::constants;
use crate::state::ExclusionMode;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let [mode_area, list_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);

    render_mode(frame, app, mode_area);

    let placeholder = if app.exclusions_loading {
        Some(constants::MSG_LOADING_EXCLUSIONS)
    } else {
        app.exclusions.placeholder()
    };

    let title = format!("Excluded sites ({})", app.exclusions.sites.len());
    let block = panel(&title, true);

    if let Some(text) = placeholder {
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::TEXT_SECONDARY))).block(block),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .exclusions
        .sites
        .iter()
        .map(|site| ListItem::new(Line::from(site.clone())))
        .collect();
    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .highlight_style(
            Style::default()
                .bg(theme::ROW_SELECTED_BG)
                .fg(theme::ROW_SELECTED_FG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, list_area, &mut app.exclusion_list_state);
}

fn render_mode(frame: &mut Frame, app: &App, area: Rect) {
    let current = app
        .exclusions
        .mode
        .map_or(constants::MSG_UNKNOWN, ExclusionMode::as_arg);

    let choice = |mode: ExclusionMode| {
        let style = if app.exclusion_mode_choice == mode {
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme::TEXT_SECONDARY)
        };
        Span::styled(format!(" {mode} "), style)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Current mode: ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(current, Style::default().fg(theme::TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("Set mode:     ", Style::default().fg(theme::TEXT_SECONDARY)),
            choice(ExclusionMode::General),
            Span::raw(" "),
            choice(ExclusionMode::Selective),
            Span::styled("  [m] toggle  [Enter] apply", Style::default().fg(theme::TEXT_SECONDARY)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Mode", false)), area);
}
