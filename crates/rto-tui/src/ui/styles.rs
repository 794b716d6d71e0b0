use ratatui::style::{Color, Modifier, Style};

use rto_core::{ComplianceStatus, Workday};

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Day cells
pub const OFFICE: Color = Color::Rgb(80, 176, 80);
pub const FLEX: Color = Color::Rgb(112, 160, 224);
pub const HOLIDAY: Color = Color::Rgb(208, 112, 48);
pub const VACATION: Color = Color::Rgb(176, 112, 208);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn what_if_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn status_style(status: ComplianceStatus) -> Style {
    let color = match status {
        ComplianceStatus::Achieved => OFFICE,
        ComplianceStatus::OnTrack => SECONDARY,
        ComplianceStatus::AtRisk => ACCENT,
        ComplianceStatus::Impossible => ERROR,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for a calendar cell. `workday` is `None` for weekends and days
/// outside the period.
pub fn day_style(workday: Option<&Workday>) -> Style {
    let Some(day) = workday else {
        return muted_style();
    };
    if day.is_holiday {
        Style::default().fg(HOLIDAY)
    } else if day.is_vacation {
        Style::default().fg(VACATION)
    } else if day.is_flex_credit {
        Style::default().fg(FLEX).add_modifier(Modifier::BOLD)
    } else if day.is_badged_in {
        Style::default().fg(OFFICE).add_modifier(Modifier::BOLD)
    } else {
        list_item_style()
    }
}
