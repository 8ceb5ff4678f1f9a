//! Toast notification overlay

use crate::app::App;
use crate::state::ToastType;
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render toast notification
pub fn render(frame: &mut Frame, app: &App) {
    if let Some(ref toast) = app.toast {
        let area = frame.area();
        let width = (area.width / 2).clamp(30, 72);

        // Calculate dynamic height based on text length + vertical padding
        let inner_width = width.saturating_sub(4) as usize; // More horizontal padding
        #[allow(clippy::cast_possible_truncation)]
        let text_lines = toast
            .message
            .lines()
            .map(|line| {
                if inner_width > 0 {
                    line.chars().count().div_ceil(inner_width).max(1)
                } else {
                    1
                }
            })
            .sum::<usize>()
            .max(1) as u16;

        // Ensure it's vertically longer (min height + padding)
        let height = (text_lines + 4).clamp(7, area.height.max(7));

        let toast_area = Rect {
            x: (area.width / 2).saturating_sub(width / 2), // True center X
            y: (area.height / 2).saturating_sub(height / 2), // True center Y
            width,
            height,
        };

        // Clear the background
        frame.render_widget(Clear, toast_area);

        let (title, color) = match toast.toast_type {
            ToastType::Info => (" INFO ", theme::INFO),
            ToastType::Success => (" SUCCESS ", theme::SUCCESS),
            ToastType::Warning => (" WARNING ", theme::WARNING),
            ToastType::Error => (" ERROR ", theme::ERROR),
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ));
        if toast.toast_type.is_modal() {
            block = block.title_bottom(
                Line::from(Span::styled(
                    " press any key ",
                    Style::default().fg(theme::TEXT_SECONDARY),
                ))
                .centered(),
            );
        }

        // Create a vertical layout inside the toast to center the text
        let inner_area = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let vertical_chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(text_lines),
            Constraint::Fill(1),
        ])
        .split(inner_area);

        let paragraph = Paragraph::new(toast.message.clone())
            .wrap(ratatui::widgets::Wrap { trim: true })
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, vertical_chunks[1]);
    }
}
