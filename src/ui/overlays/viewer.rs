//! Read-only text viewer overlay (license text and similar).

use super::centered_percent;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Render a scrollable text viewer
#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, title: &str, content: &str, scroll: u16) {
    let area = centered_percent(85, 85, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(format!(" {title} "))
        .title_bottom(Line::from(" [Esc] Close  [↑/↓] Scroll  [PgUp/PgDn] Page ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = content.lines().map(highlight_line).collect();
    let total_lines = lines.len();

    let content_area = Layout::vertical([
        Constraint::Length(1), // Position
        Constraint::Min(1),    // Content
    ])
    .split(inner);

    // Keys scroll freely; stop at the last page here
    let max_scroll = total_lines.saturating_sub(content_area[1].height as usize);
    let scroll = usize::from(scroll).min(max_scroll);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" line {}/{}", scroll + 1, total_lines.max(1)),
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
        content_area[0],
    );

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, content_area[1]);

    // Scrollbar Logic
    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme::TEXT_SECONDARY))
        .thumb_style(Style::default().fg(theme::ACCENT_PRIMARY));

    let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);

    // Scrollbar on the right border
    let scroll_area = Rect {
        x: area.right().saturating_sub(1),
        y: content_area[1].y,
        width: 1,
        height: content_area[1].height,
    };

    frame.render_stateful_widget(scrollbar, scroll_area, &mut scrollbar_state);
}

/// All-caps lines read as headings in license texts.
fn highlight_line(line: &str) -> Line<'static> {
    let trimmed = line.trim();
    let is_heading = trimmed.len() > 3
        && trimmed.chars().any(char::is_alphabetic)
        && !trimmed.chars().any(char::is_lowercase);
    if is_heading {
        Line::from(Span::styled(
            line.to_string(),
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(line.to_string())
    }
}
