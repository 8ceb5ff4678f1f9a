//! UI rendering module

mod overlays;
mod tabs;
mod widgets;

use crate::app::App;
use crate::message::actions_for;
use crate::state::InputMode;
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Paragraph,
    Frame,
};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 16;

/// Main render function - dispatches to appropriate view
pub fn render(frame: &mut Frame, app: &mut App) {
    let (width, height) = app.terminal_size;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        render_too_small(frame, width, height);
        return;
    }

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    widgets::header::render(frame, app, header);
    tabs::render(frame, app, body);
    widgets::footer::render(frame, app, footer);

    match &app.input_mode {
        InputMode::Login {
            username,
            password,
            focused,
        } => overlays::login::render(frame, username, password, *focused, app.login_notice.as_deref()),
        InputMode::Prompt { purpose, value } => overlays::prompt::render(frame, *purpose, value),
        InputMode::Confirm { message, .. } => overlays::confirm::render(frame, message),
        InputMode::Viewer {
            title,
            content,
            scroll,
        } => overlays::viewer::render(frame, title, content, *scroll),
        InputMode::Normal | InputMode::Search { .. } | InputMode::EditSetting { .. } => {}
    }

    if app.show_action_menu {
        let items = actions_for(app.active_tab);
        let title = format!("{} Actions", app.active_tab.title());
        overlays::action_menu::render(frame, &items, &mut app.action_menu_state, &title);
    }

    // Toasts sit above everything so modal errors are never hidden
    if app.toast.is_some() {
        overlays::toast::render(frame, app);
    }
}

fn render_too_small(frame: &mut Frame, width: u16, height: u16) {
    let text = format!("Terminal too small ({width}x{height}), need {MIN_WIDTH}x{MIN_HEIGHT}");
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(theme::WARNING))
            .centered(),
        frame.area(),
    );
}
