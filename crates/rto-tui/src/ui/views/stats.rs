//! Statistics panel shown beside the calendar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use rto_core::PeriodStats;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match &app.period_stats {
        Some(stats) => period_lines(&mut lines, stats, app.data.settings.goal),
        None => lines.push(Line::from(Span::styled(
            "No period selected",
            styles::muted_style(),
        ))),
    }

    if let Some(year) = &app.year_stats {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" Year {}", year.start_date.format("%Y")),
            styles::highlight_style(),
        )));
        lines.push(Line::from(vec![
            label("Status"),
            Span::styled(year.compliance_status.to_string(), styles::status_style(year.compliance_status)),
        ]));
        lines.push(row("Badged / required", format!("{} / {}", year.days_badged_in, year.days_required)));
        lines.push(row("Pace", format!("{:+}", year.days_ahead_of_pace)));
    }

    selected_day_lines(&mut lines, app);

    let title = app
        .current_period()
        .map(|p| format!(" {} ({}) ", p.name, p.key))
        .unwrap_or_default();
    let block = Block::default()
        .title(Span::styled(title, styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn period_lines(lines: &mut Vec<Line<'static>>, stats: &PeriodStats, goal_pct: i32) {
    lines.push(Line::from(vec![
        label("Status"),
        Span::styled(
            stats.compliance_status.to_string(),
            styles::status_style(stats.compliance_status),
        ),
    ]));
    lines.push(row("Ahead of pace", format!("{:+}", stats.days_ahead_of_pace)));
    if stats.remaining_missable_days >= 0 {
        lines.push(row("Skippable left", stats.remaining_missable_days.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(row(
        "Required",
        format!("{} of {} ({}%)", stats.days_required, stats.total_days, goal_pct),
    ));
    lines.push(row(
        "Badged in",
        format!(
            "{} ({} office, {} flex)",
            stats.days_badged_in,
            stats.office_days(),
            stats.flex_days
        ),
    ));
    lines.push(row("Still needed", stats.days_still_needed.to_string()));
    lines.push(Line::from(""));
    lines.push(row("Elapsed", stats.days_thus_far.to_string()));
    lines.push(row("Remaining", stats.days_left.to_string()));
    if stats.days_thus_far > 0 {
        lines.push(row("Average", format!("{:.1}%", stats.current_average * 100.0)));
    }
    if stats.days_left > 0 && stats.days_still_needed > 0 {
        lines.push(row(
            "Rate needed",
            format!("{:.1}%", stats.required_future_average * 100.0),
        ));
    }
    if let Some(date) = stats.projected_completion_date {
        lines.push(row("Projected done", date.format("%b %-d, %Y").to_string()));
    }
    lines.push(Line::from(""));
    lines.push(row("Holidays", stats.holidays.to_string()));
    lines.push(row("Vacation days", stats.vacation_days.to_string()));
    lines.push(row("Days off", stats.days_off.to_string()));
}

fn selected_day_lines(lines: &mut Vec<Line<'static>>, app: &App) {
    let date = app.selected_date;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {}", date.format("%a %b %-d, %Y")),
        styles::highlight_style(),
    )));

    if let Some(h) = app.data.holidays.get(date) {
        lines.push(Line::from(format!("  Holiday: {}", h.name)));
    }
    if let Some(v) = app.data.vacations.vacation_map().get(&date) {
        lines.push(Line::from(format!("  Vacation: {}", v.destination)));
    }
    if let Some(b) = app.badges().get(date).filter(|b| b.is_badged_in) {
        let kind = if b.is_flex_credit { "Flex" } else { "Office" };
        lines.push(Line::from(format!("  {}: {}", kind, b.office)));
    }
    if let Some(events) = app.data.events.event_map().get(&date) {
        for e in events {
            lines.push(Line::from(format!("  * {}", e.description)));
        }
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!(" {:<16}", text), styles::muted_style())
}

fn row(text: &str, value: String) -> Line<'static> {
    Line::from(vec![label(text), Span::styled(value, styles::list_item_style())])
}
