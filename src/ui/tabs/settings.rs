//! Settings tab: the CLI configuration form.

use super::panel;
use crate::app::App;
use crate::core::dispatch::CommandKind;
use crate::state::{InputMode, SettingsField};
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [form_area, help_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Min(3)]).areas(area);

    let lines: Vec<Line> = SettingsField::ALL
        .iter()
        .map(|&field| field_line(app, field))
        .collect();

    let title = if app.is_busy(CommandKind::ApplySettings) {
        "Settings (applying...)"
    } else if app.is_busy(CommandKind::Config) {
        "Settings (loading...)"
    } else {
        "Settings"
    };
    frame.render_widget(
        Paragraph::new(lines).block(panel(title, true)),
        form_area,
    );

    let help = vec![
        Line::from(Span::styled(
            "Enter edits text fields and cycles the others. Only changed fields are written.",
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "Empty SOCKS and DNS values are left untouched.",
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
    ];
    frame.render_widget(Paragraph::new(help).block(panel("Help", false)), help_area);
}

fn field_line(app: &App, field: SettingsField) -> Line<'static> {
    let selected = app.settings_field == field;
    let marker = if selected { "▶ " } else { "  " };

    let value = match (&app.input_mode, field) {
        (InputMode::EditSetting { field: editing, buffer }, _) if *editing == field => {
            format!("{buffer}█")
        }
        (_, SettingsField::Mode) => format!("◀ {} ▶", app.settings.vpn_mode.as_arg()),
        (_, SettingsField::Channel) => format!("◀ {} ▶", app.settings.update_channel.as_arg()),
        _ => {
            let text = app.setting_text(field);
            if text.is_empty() {
                "(not set)".to_string()
            } else {
                text.to_string()
            }
        }
    };

    let label_style = if selected {
        Style::default()
            .fg(theme::ROW_SELECTED_FG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_SECONDARY)
    };
    let value_style = if selected {
        Style::default().fg(theme::TEXT_PRIMARY).bg(theme::ROW_SELECTED_BG)
    } else {
        Style::default().fg(theme::TEXT_PRIMARY)
    };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme::ACCENT_PRIMARY)),
        Span::styled(format!("{:<16}", field.label()), label_style),
        Span::styled(value, value_style),
    ])
}
