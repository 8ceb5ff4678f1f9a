//! About tab: versions, CLI path and project links.

use super::panel;
use crate::app::App;
use crate::constants;
use crate::core::dispatch::CommandKind;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [info_area, links_area] =
        Layout::vertical([Constraint::Length(10), Constraint::Min(4)]).areas(area);

    let label = |text: &'static str| Span::styled(format!("{text:<14}"), Style::default().fg(theme::TEXT_SECONDARY));
    let value = |text: String| Span::styled(text, Style::default().fg(theme::TEXT_PRIMARY));

    let cli_version = app
        .session
        .cli_version
        .clone()
        .unwrap_or_else(|| constants::MSG_UNKNOWN.to_string());
    let update_note = if app.is_busy(CommandKind::CheckUpdate) {
        "  checking for updates..."
    } else if app.is_busy(CommandKind::Update) {
        "  updating..."
    } else {
        ""
    };

    let account = if app.session.logged_in { "logged in" } else { "logged out" };
    let privileges = if app.is_root { "root" } else { "user" };

    let mut lines = vec![
        Line::from(Span::styled(
            constants::APP_SUMMARY,
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![label("App version"), value(constants::APP_VERSION.to_string())]),
        Line::from(vec![
            label("CLI version"),
            value(cli_version),
            Span::styled(update_note, Style::default().fg(theme::WARNING)),
        ]),
        Line::from(vec![
            label("CLI path"),
            value(app.session.executable.display().to_string()),
            Span::styled(
                format!("  ({})", app.session.source.describe()),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
        ]),
        Line::from(vec![
            label("Account"),
            value(account.to_string()),
        ]),
        Line::from(vec![
            label("Privileges"),
            value(privileges.to_string()),
        ]),
    ];
    if let Some(problem) = &app.session.permission_problem {
        lines.push(Line::from(vec![
            label("CLI check"),
            Span::styled(problem.clone(), Style::default().fg(theme::WARNING)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("About", true)), info_area);

    let links = vec![
        Line::from(vec![
            Span::styled("[w] ", Style::default().fg(theme::ACCENT_KEY)),
            value(constants::LINK_WEBSITE.to_string()),
        ]),
        Line::from(vec![
            Span::styled("[g] ", Style::default().fg(theme::ACCENT_KEY)),
            value(constants::LINK_CLI_REPO.to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(links).block(panel("Links", false)), links_area);
}
