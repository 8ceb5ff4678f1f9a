//! Header with the tab bar and a compact connection badge.

use crate::app::App;
use crate::state::{ConnectionState, Tab};
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Indicator color for a connection state.
#[must_use]
pub fn status_color(state: &ConnectionState) -> Color {
    match state {
        ConnectionState::Unknown => theme::INACTIVE,
        ConnectionState::Connecting { .. } | ConnectionState::Disconnecting { .. } => theme::WARNING,
        ConnectionState::Connected { .. } => theme::SUCCESS,
        ConnectionState::Disconnected { .. } | ConnectionState::Failed { .. } => theme::ERROR,
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand_area, tabs_area, badge_area] = Layout::horizontal([
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(30),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " AdGuard VPN ",
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        brand_area,
    );

    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())));
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(theme::TEXT_SECONDARY))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("│", Style::default().fg(theme::PANEL_DARK)));
    frame.render_widget(tabs, tabs_area);

    let color = status_color(&app.connection_state);
    let mut badge = vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(app.connection_state.label(), Style::default().fg(color)),
    ];
    if !app.session.logged_in {
        badge.push(Span::styled("  logged out", Style::default().fg(theme::TEXT_SECONDARY)));
    }
    badge.push(Span::raw(" "));
    frame.render_widget(Paragraph::new(Line::from(badge)).right_aligned(), badge_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(&ConnectionState::Unknown), theme::INACTIVE);
        assert_eq!(
            status_color(&ConnectionState::Disconnecting {
                started: Instant::now()
            }),
            theme::WARNING
        );
        assert_eq!(
            status_color(&ConnectionState::Failed {
                reason: "denied".into()
            }),
            theme::ERROR
        );
        assert_eq!(status_color(&ConnectionState::disconnected()), theme::ERROR);
    }
}
