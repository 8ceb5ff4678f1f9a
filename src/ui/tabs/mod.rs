//! One view per tab.

mod about;
mod exclusions;
mod locations;
mod main_tab;
mod settings;

use crate::app::App;
use crate::state::Tab;
use crate::theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, BorderType, Borders},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        Tab::Main => main_tab::render(frame, app, area),
        Tab::Locations => locations::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
        Tab::Exclusions => exclusions::render(frame, app, area),
        Tab::About => about::render(frame, app, area),
    }
}

/// Rounded panel with a title.
fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        theme::BORDER_FOCUSED
    } else {
        theme::BORDER_DEFAULT
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {title} "))
}
