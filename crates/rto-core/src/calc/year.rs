use chrono::NaiveDate;

use super::period_stats::{calculate_period_stats, PeriodStats};
use crate::models::{BadgeEntryData, HolidayData, TimePeriod, VacationData};

/// Key and name of the synthetic period built by [`calculate_year_stats`].
pub const YEAR_PERIOD_NAME: &str = "Year";

/// Statistics across several periods, computed over one synthetic period
/// spanning the earliest start to the latest end.
///
/// Returns `None` when `periods` is empty, which callers must treat as "no
/// data" rather than an all-zero result.
pub fn calculate_year_stats(
    periods: &[TimePeriod],
    badges: &BadgeEntryData,
    holidays: &HolidayData,
    vacations: &VacationData,
    goal_pct: i32,
    today: Option<NaiveDate>,
) -> Option<PeriodStats> {
    let start = periods.iter().map(|p| p.start_date).min()?;
    let end = periods.iter().map(|p| p.end_date).max()?;

    let year = TimePeriod::new(YEAR_PERIOD_NAME, YEAR_PERIOD_NAME, start, end);
    Some(calculate_period_stats(
        &year, badges, holidays, vacations, goal_pct, today,
    ))
}
