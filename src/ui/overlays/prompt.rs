//! Single-line text prompt overlay.

use super::centered_rect;
use crate::state::PromptPurpose;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, purpose: PromptPurpose, value: &str) {
    let area = centered_rect(64, 6, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(format!(" {} ", purpose.title()))
        .title_bottom(Line::from(" [Enter] OK  [Esc] Cancel ").centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [hint_area, _, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(purpose.hint(), Style::default().fg(theme::TEXT_SECONDARY))),
        hint_area,
    );

    // Keep the tail of long paths visible
    let room = usize::from(input_area.width.saturating_sub(3));
    let count = value.chars().count();
    let shown: String = value.chars().skip(count.saturating_sub(room)).collect();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(theme::ACCENT_KEY)),
            Span::styled(shown, Style::default().fg(theme::TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(theme::ACCENT_PRIMARY)),
        ])),
        input_area,
    );
}
