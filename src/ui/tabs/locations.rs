//! Locations tab: searchable, sortable server table.

use super::panel;
use crate::app::App;
use crate::constants;
use crate::state::{InputMode, LocationColumn, SortOrder};
use crate::theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    render_search(frame, app, search_area);
    render_table(frame, app, table_area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let (text, editing) = match &app.input_mode {
        InputMode::Search { query } => (query.as_str(), true),
        _ => (app.locations.filter.as_str(), false),
    };
    let mut spans = vec![Span::styled("/ ", Style::default().fg(theme::ACCENT_KEY))];
    if text.is_empty() && !editing {
        spans.push(Span::styled(
            "Search by ISO, country or city",
            Style::default().fg(theme::TEXT_SECONDARY),
        ));
    } else {
        spans.push(Span::styled(text.to_string(), Style::default().fg(theme::TEXT_PRIMARY)));
    }
    if editing {
        spans.push(Span::styled("█", Style::default().fg(theme::ACCENT_PRIMARY)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel("Search", editing)),
        area,
    );
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header = Row::new(LocationColumn::ALL.map(|column| {
        let marker = match (app.locations.sort_column, app.locations.sort_order) {
            (Some(active), SortOrder::Ascending) if active == column => " ▲",
            (Some(active), SortOrder::Descending) if active == column => " ▼",
            _ => "",
        };
        Cell::from(format!("{}{marker}", column.title()))
    }))
    .style(
        Style::default()
            .fg(theme::ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    );

    let visible = app.locations.visible();
    let placeholder = if app.locations.loading {
        Some(constants::MSG_LOADING_LOCATIONS)
    } else if visible.is_empty() {
        Some(constants::MSG_NO_LOCATIONS)
    } else {
        None
    };

    let rows: Vec<Row> = match placeholder {
        Some(text) => vec![Row::new([Cell::from(Span::styled(
            text,
            Style::default().fg(theme::TEXT_SECONDARY),
        ))])],
        None => visible
            .iter()
            .map(|entry| {
                Row::new([
                    Cell::from(entry.iso_code.clone()),
                    Cell::from(entry.country.clone()),
                    Cell::from(entry.city.clone()),
                    Cell::from(entry.ping.to_string()),
                ])
                .style(Style::default().fg(theme::TEXT_PRIMARY))
            })
            .collect(),
    };

    let title = if app.locations.filter.is_empty() {
        format!("Locations ({})", app.locations.entries.len())
    } else {
        format!("Locations ({} of {})", visible.len(), app.locations.entries.len())
    };

    let widths = if placeholder.is_some() {
        vec![Constraint::Fill(1)]
    } else {
        vec![
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(8),
        ]
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, true))
        .row_highlight_style(
            Style::default()
                .bg(theme::ROW_SELECTED_BG)
                .fg(theme::ROW_SELECTED_FG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    if placeholder.is_some() {
        frame.render_widget(table, area);
    } else {
        frame.render_stateful_widget(table, area, &mut app.location_table_state);
    }
}
