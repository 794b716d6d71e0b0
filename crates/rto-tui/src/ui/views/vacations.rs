//! Vacations view - configured leave with the weekdays each one covers.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Destination", "Start", "End", "Weekdays", "Approved"])
        .style(styles::highlight_style());

    let rows: Vec<Row> = app
        .data
        .vacations
        .all()
        .iter()
        .map(|v| {
            Row::new(vec![
                Cell::from(v.destination.clone()),
                Cell::from(v.start_date.to_string()),
                Cell::from(v.end_date.to_string()),
                Cell::from(v.weekdays().count().to_string()),
                Cell::from(if v.approved { "Yes" } else { "No" }),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            format!(" Vacations ({}) ", app.data.vacations.len()),
            styles::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.data.vacations.is_empty() {
        state.select(Some(app.list_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
