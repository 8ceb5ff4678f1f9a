//! Login form overlay.

use super::centered_rect;
use crate::state::LoginField;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the username/password form. The password is always masked.
pub fn render(
    frame: &mut Frame,
    username: &str,
    password: &str,
    focused: LoginField,
    notice: Option<&str>,
) {
    let area = centered_rect(52, 11, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(" Log in to AdGuard VPN ")
        .title_bottom(Line::from(" [Tab] Switch  [Enter] Submit  [Esc] Cancel ").centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [user_area, pass_area, notice_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(inner);

    let masked = "•".repeat(password.chars().count());
    render_field(frame, user_area, "Username", username, focused == LoginField::Username);
    render_field(frame, pass_area, "Password", &masked, focused == LoginField::Password);

    if let Some(notice) = notice {
        frame.render_widget(
            Paragraph::new(Span::styled(notice, Style::default().fg(theme::WARNING))).centered(),
            notice_area,
        );
    }
}

fn render_field(frame: &mut Frame, area: ratatui::layout::Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        theme::BORDER_FOCUSED
    } else {
        theme::BORDER_DEFAULT
    };
    let mut spans = vec![Span::styled(value.to_string(), Style::default().fg(theme::TEXT_PRIMARY))];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(theme::ACCENT_PRIMARY)));
    }
    let field = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" {label} "),
                Style::default().add_modifier(if focused {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
            )),
    );
    frame.render_widget(field, area);
}
