use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Status flags for a single weekday inside a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Workday {
    pub date: NaiveDate,
    pub is_badged_in: bool,
    pub is_flex_credit: bool,
    pub is_holiday: bool,
    pub is_vacation: bool,
}

impl Workday {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_badged_in: false,
            is_flex_credit: false,
            is_holiday: false,
            is_vacation: false,
        }
    }
}

/// Returns true for Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Builds one `Workday` per weekday in `[start, end]`, keyed by date.
///
/// Weekends never appear as keys. An inverted range yields an empty map.
pub fn build_workday_map(start: NaiveDate, end: NaiveDate) -> BTreeMap<NaiveDate, Workday> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d))
        .map(|d| (d, Workday::new(d)))
        .collect()
}
