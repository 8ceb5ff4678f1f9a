//! Yes/no confirmation overlay.

use super::centered_rect;
use crate::theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, message: &str) {
    let width = 56u16;
    let inner_width = usize::from(width - 4);
    let lines = message
        .lines()
        .map(|line| line.chars().count().div_ceil(inner_width).max(1))
        .sum::<usize>()
        .max(1);
    let height = (lines as u16).saturating_add(5).min(frame.area().height);
    let area = centered_rect(width, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::WARNING))
        .title(Span::styled(
            " Confirm ",
            Style::default().fg(theme::WARNING).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(vec![
                Span::styled(" [y] ", Style::default().fg(theme::ACCENT_KEY)),
                Span::raw("Yes  "),
                Span::styled("[n] ", Style::default().fg(theme::ACCENT_KEY)),
                Span::raw("No "),
            ])
            .centered(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = Paragraph::new(format!("\n{message}"))
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .wrap(Wrap { trim: true })
        .centered();
    frame.render_widget(text, inner);
}
