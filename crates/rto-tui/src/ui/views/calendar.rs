//! Calendar view - month grids for the active period beside its statistics.

use chrono::{Datelike, Months, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::stats;

/// Width of one month grid including borders
const MONTH_WIDTH: u16 = 24;
/// Header plus six week rows plus borders
const MONTH_HEIGHT: u16 = 9;
const STATS_PANEL_WIDTH: u16 = 40;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(MONTH_WIDTH), Constraint::Length(STATS_PANEL_WIDTH)])
        .split(area);

    render_months(frame, app, chunks[0]);
    stats::render(frame, app, chunks[1]);
}

fn render_months(frame: &mut Frame, app: &App, area: Rect) {
    let Some(period) = app.current_period() else {
        let paragraph = Paragraph::new("No time periods configured. Run 'rto init'.")
            .style(styles::muted_style())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let months = period.months();
    let columns = app.data.periods.calendar_display_columns().max(1);
    let rows = months.len().div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            std::iter::repeat(Constraint::Length(MONTH_HEIGHT))
                .take(rows)
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (row, chunk) in months.chunks(columns).enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                std::iter::repeat(Constraint::Length(MONTH_WIDTH))
                    .take(columns)
                    .chain(std::iter::once(Constraint::Min(0))),
            )
            .split(row_areas[row]);
        for (col, month) in chunk.iter().enumerate() {
            render_month(frame, app, *month, col_areas[col]);
        }
    }
}

fn render_month(frame: &mut Frame, app: &App, first: NaiveDate, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Mo Tu We Th Fr Sa Su",
        styles::muted_style(),
    ))];

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut spans: Vec<Span> = vec![Span::raw("   ".repeat(offset))];
    let mut column = offset;

    for date in month_days(first) {
        let workday = app.period_stats.as_ref().and_then(|s| s.workday(date));
        let mut style = styles::day_style(workday);
        if date == app.today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if date == app.selected_date {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{:>2}", date.day()), style));

        column += 1;
        if column == 7 {
            lines.push(Line::from(std::mem::take(&mut spans)));
            column = 0;
        } else {
            spans.push(Span::raw(" "));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    let focused = first.year() == app.selected_date.year() && first.month() == app.selected_date.month();
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", first.format("%B %Y")),
            styles::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Every date in the month starting at `first`.
fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let next = first.checked_add_months(Months::new(1));
    first
        .iter_days()
        .take_while(move |d| next.is_some_and(|n| *d < n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_days() {
        let feb = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(month_days(feb).count(), 28);
        let dec = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(month_days(dec).last(), NaiveDate::from_ymd_opt(2025, 12, 31));
    }
}
