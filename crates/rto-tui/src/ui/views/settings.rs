//! Options view - the settings that can be edited in place.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, SettingField};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Setting", "Value"]).style(styles::highlight_style());

    let rows: Vec<Row> = SettingField::ALL
        .iter()
        .map(|field| {
            Row::new(vec![
                Cell::from(field.label()),
                Cell::from(field.value(&app.data.settings)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Options ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(20)])
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.list_selection));
    frame.render_stateful_widget(table, area, &mut state);
}
