//! Main tab: connection status, details and the activity log.

use super::panel;
use crate::app::App;
use crate::constants;
use crate::logger::{self, LogLevel};
use crate::state::ConnectionState;
use crate::theme;
use crate::ui::widgets::header::status_color;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [status_area, log_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Min(4)]).areas(area);

    render_status(frame, app, status_area);
    render_log(frame, app, log_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.connection_state;
    let color = status_color(state);

    let (ip, location, protocol) = match state {
        ConnectionState::Connected { details, .. } => (
            details
                .public_ip
                .clone()
                .unwrap_or_else(|| constants::MSG_DETECTING.to_string()),
            details.location.clone(),
            if details.interface.is_empty() {
                details.protocol.clone()
            } else {
                format!("{} ({})", details.protocol, details.interface)
            },
        ),
        _ => (
            constants::MSG_NOT_CONNECTED.to_string(),
            constants::MSG_NOT_CONNECTED.to_string(),
            constants::MSG_NOT_CONNECTED.to_string(),
        ),
    };

    let label = |text: &'static str| Span::styled(format!("{text:<12}"), Style::default().fg(theme::TEXT_SECONDARY));
    let value = |text: String| Span::styled(text, Style::default().fg(theme::TEXT_PRIMARY));

    let mut indicator = vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(
            state.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    match state {
        ConnectionState::Connecting { target, .. } => {
            indicator.push(Span::styled(
                format!("  {} {target}", spinner()),
                Style::default().fg(theme::WARNING),
            ));
        }
        ConnectionState::Connected { since, .. } => {
            indicator.push(Span::styled(
                format!("  {}", format_duration(since.elapsed().as_secs())),
                Style::default().fg(theme::TEXT_SECONDARY),
            ));
        }
        ConnectionState::Failed { reason } => {
            indicator.push(Span::styled(
                format!("  {reason}"),
                Style::default().fg(theme::ERROR),
            ));
        }
        _ => {}
    }

    let mut lines = vec![
        Line::from(indicator),
        Line::default(),
        Line::from(vec![label("IP Address"), value(ip)]),
        Line::from(vec![label("Location"), value(location)]),
        Line::from(vec![label("Protocol"), value(protocol)]),
    ];
    if !app.session.logged_in {
        lines.push(Line::from(Span::styled(
            "Not logged in. Press l to log in.",
            Style::default().fg(theme::WARNING),
        )));
    } else if let Some(problem) = &app.session.permission_problem {
        lines.push(Line::from(Span::styled(
            format!("CLI unusable: {problem}"),
            Style::default().fg(theme::WARNING),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel("Connection", true)),
        area,
    );
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let entries = logger::get_logs();
    let height = usize::from(area.height.saturating_sub(2)).max(1);
    let total = entries.len();

    // `logs_scroll` is the bottom visible line
    let bottom = if app.logs_auto_scroll {
        total.saturating_sub(1)
    } else {
        usize::from(app.logs_scroll).min(total.saturating_sub(1))
    };
    let start = (bottom + 1).saturating_sub(height);

    let lines: Vec<Line> = entries
        .iter()
        .skip(start)
        .take(height)
        .map(|entry| {
            let level_color = match entry.level {
                LogLevel::Info => theme::TEXT_SECONDARY,
                LogLevel::Warning => theme::WARNING,
                LogLevel::Error => theme::ERROR,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp),
                    Style::default().fg(theme::TEXT_SECONDARY),
                ),
                Span::styled(
                    format!("{:<6}", entry.category),
                    Style::default().fg(theme::ACCENT_KEY),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(level_color)),
            ])
        })
        .collect();

    let title = if app.logs_auto_scroll || total == 0 {
        "Activity Log".to_string()
    } else {
        format!("Activity Log ({}/{total})", bottom + 1)
    };
    frame.render_widget(Paragraph::new(lines).block(panel(&title, false)), area);
}

fn spinner() -> &'static str {
    const FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
    let tick = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() / 250);
    #[allow(clippy::cast_possible_truncation)]
    let idx = (tick % 4) as usize;
    FRAMES[idx]
}

/// `HH:MM:SS` connection uptime.
fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
