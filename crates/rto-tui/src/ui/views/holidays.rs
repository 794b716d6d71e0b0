//! Holidays view - every configured holiday, editable in place.

use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Date", "Day", "Name"]).style(styles::highlight_style());

    let rows: Vec<Row> = app
        .data
        .holidays
        .all()
        .iter()
        .map(|h| {
            let style = if h.date < app.today {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(h.date.to_string()),
                Cell::from(h.date.weekday().to_string()),
                Cell::from(h.name.clone()),
            ])
            .style(style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            format!(" Holidays ({}) ", app.data.holidays.len()),
            styles::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [Constraint::Length(12), Constraint::Length(5), Constraint::Min(20)],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.data.holidays.is_empty() {
        state.select(Some(app.list_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
