//! Year view - per-period status for the selected year plus the aggregate.

use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use rto_core::PeriodStats;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(total) = &app.year_stats else {
        let paragraph = Paragraph::new("No time periods for this year")
            .style(styles::muted_style())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let header = Row::new(vec![
        "Period", "Dates", "Status", "Badged", "Required", "Needed", "Pace", "Average",
    ])
    .style(styles::highlight_style());

    let current_key = app.current_period().map(|p| p.key.as_str());
    let mut rows: Vec<Row> = app
        .year_breakdown
        .iter()
        .map(|s| {
            let row = stats_row(s);
            if Some(s.key.as_str()) == current_key {
                row.style(styles::selected_style())
            } else {
                row
            }
        })
        .collect();
    rows.push(stats_row(total).style(styles::list_item_style().add_modifier(Modifier::BOLD)));

    let block = Block::default()
        .title(Span::styled(
            format!(" Year {} ", total.start_date.format("%Y")),
            styles::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(25),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn stats_row(s: &PeriodStats) -> Row<'static> {
    let average = if s.days_thus_far > 0 {
        format!("{:.1}%", s.current_average * 100.0)
    } else {
        "-".to_string()
    };
    Row::new(vec![
        Cell::from(s.key.clone()),
        Cell::from(format!("{} - {}", s.start_date, s.end_date)),
        Cell::from(Span::styled(
            s.compliance_status.to_string(),
            styles::status_style(s.compliance_status),
        )),
        Cell::from(s.days_badged_in.to_string()),
        Cell::from(s.days_required.to_string()),
        Cell::from(s.days_still_needed.to_string()),
        Cell::from(format!("{:+}", s.days_ahead_of_pace)),
        Cell::from(average),
    ])
}
