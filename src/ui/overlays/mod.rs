//! Overlays drawn above the active tab.

pub mod action_menu;
pub mod confirm;
pub mod login;
pub mod prompt;
pub mod toast;
pub mod viewer;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Create a centered rectangle with fixed dimensions
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Create a centered rectangle sized as a share of `area`
pub(super) fn centered_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
