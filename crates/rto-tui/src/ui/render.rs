use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, View};

use super::styles;
use super::views::{calendar, holidays, settings, vacations, year};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Views
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_views(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    if matches!(app.state, AppState::Editing) {
        render_form_overlay(frame, app);
    }

    if matches!(app.state, AppState::SearchingEvents) {
        render_search_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  RTO Tracker";
    let help_hint = "[?] Help";

    let mut spans = vec![Span::styled(title, styles::title_style())];
    let mut used = title.len();

    let period = format!("   {}", app.period_file());
    used += period.len();
    spans.push(Span::styled(period, styles::muted_style()));

    if app.in_what_if() {
        let badge = " WHAT-IF ";
        used += badge.len() + 3;
        spans.push(Span::raw("   "));
        spans.push(Span::styled(badge, styles::what_if_style()));
    }

    spans.push(Span::raw(" ".repeat(
        (area.width as usize).saturating_sub(used + help_hint.len() + 2),
    )));
    spans.push(Span::styled(help_hint, styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_views(frame: &mut Frame, app: &App, area: Rect) {
    let views = [
        ("[c]alendar", View::Calendar),
        ("[v]acations", View::Vacations),
        ("h[o]lidays", View::Holidays),
        ("[y]ear", View::Year),
        ("o[p]tions", View::Settings),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, view)) in views.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(app.view == *view)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Calendar => calendar::render(frame, app, area),
        View::Vacations => vacations::render(frame, app, area),
        View::Holidays => holidays::render(frame, app, area),
        View::Year => year::render(frame, app, area),
        View::Settings => settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match (app.state, app.view) {
        (AppState::Editing, _) => "Tab next field  Enter apply  Esc cancel",
        (AppState::SearchingEvents, _) => "↑↓ select  Enter go to date  Esc cancel",
        (_, View::Calendar) => "[b]adge [f]lex [a]dd event [/]search [s]ave [q]uit",
        (_, View::Vacations | View::Holidays) => "[a]dd [e]dit [d]elete [s]ave [q]uit",
        (_, View::Settings) => "[e]dit [s]ave [q]uit",
        (_, View::Year) => "[ ] period [s]ave [q]uit",
    };

    let left_text = match &app.status_message {
        Some(msg) => format!(" {} ", msg),
        None => format!(" {} ", app.selected_date.format("%a %b %-d, %Y")),
    };
    let dirty = if app.is_dirty() { "* unsaved " } else { "" };
    let right_text = format!(" {}{} ", dirty, shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let left_style = if app
        .status_message
        .as_deref()
        .is_some_and(|m| {
            m.contains("failed") || m.contains("Could not") || m.starts_with("Invalid")
        })
    {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line).style(styles::status_bar_style()), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 32, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  RTO Tracker", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("←↑↓→ hjkl", "Move selected day / row"),
        help_line("[ ]", "Previous / next time period"),
        help_line("t", "Jump to today"),
        help_line("Tab", "Cycle time period files"),
        help_line("c v o y p", "Calendar/vacations/holidays/year/options"),
        Line::from(""),
        Line::from(Span::styled(" Editing", styles::highlight_style())),
        help_line("b", "Toggle office badge-in"),
        help_line("f", "Toggle flex credit"),
        help_line("w", "Enter / leave what-if mode"),
        help_line("a / d", "Add / delete an event on the selected day"),
        help_line("/", "Search events"),
        Line::from(""),
        Line::from(Span::styled(" Lists and options", styles::highlight_style())),
        help_line("a", "Add vacation / holiday"),
        help_line("e Enter", "Edit selected row"),
        help_line("d Del", "Delete selected row"),
        Line::from(""),
        Line::from(Span::styled(" Data", styles::highlight_style())),
        help_line("s", "Save"),
        help_line("g", "Save and back up with git"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };
    let height = form.fields.len() as u16 * 2 + 4;
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for (idx, (label, value)) in form.labels.iter().zip(&form.fields).enumerate() {
        let focused = idx == form.focus;
        let label_style = if focused {
            styles::help_key_style()
        } else {
            styles::muted_style()
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", label), label_style),
            Span::styled(format!("{}{}", value, cursor), styles::list_item_style()),
        ]));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(Span::styled(format!(" {} ", form.title()), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_search_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 16, frame.area());
    frame.render_widget(Clear, area);

    let results = app.search_results();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Find: ", styles::help_key_style()),
            Span::styled(format!("{}_", app.search_query), styles::list_item_style()),
        ]),
        Line::from(""),
    ];
    if results.is_empty() && !app.search_query.is_empty() {
        lines.push(Line::from(Span::styled("  No matching events", styles::muted_style())));
    }
    let visible = area.height.saturating_sub(5) as usize;
    let skip = app.search_selection.saturating_sub(visible.saturating_sub(1));
    for (idx, event) in results.iter().enumerate().skip(skip).take(visible) {
        let style = if idx == app.search_selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(Span::styled(
            format!("  {}  {}", event.date, event.description),
            style,
        )));
    }

    let block = Block::default()
        .title(Span::styled(
            format!(" Search events ({}) ", results.len()),
            styles::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   You have unsaved changes. Quit anyway?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
