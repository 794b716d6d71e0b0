use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// File name of the default period configuration.
pub const DEFAULT_TIME_PERIOD_FILE: &str = "workday-fiscal-quarters.yaml";

const DEFAULT_CALENDAR_DISPLAY_COLUMNS: usize = 3;

/// A named, inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub key: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TimePeriod {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(DataError::InvalidRange {
                key: self.key.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Number of calendar months the period touches.
    pub fn month_span(&self) -> u32 {
        let years = self.end_date.year() - self.start_date.year();
        let months = self.end_date.month() as i32 - self.start_date.month() as i32;
        (years * 12 + months + 1).max(0) as u32
    }

    /// First day of every month the period touches, in order.
    pub fn months(&self) -> Vec<NaiveDate> {
        let Some(first) = self.start_date.with_day(1) else {
            return Vec::new();
        };
        (0..self.month_span())
            .filter_map(|i| first.checked_add_months(Months::new(i)))
            .collect()
    }
}

/// Build a key like `Q1_2025` from a period label and year.
pub fn period_key(name: &str, year: i32) -> String {
    format!("{}_{}", name.to_uppercase(), year)
}

/// All periods from one configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePeriodData {
    #[serde(default, skip_serializing_if = "is_zero")]
    calendar_display_columns: usize,
    #[serde(rename = "timeperiods", default)]
    periods: Vec<TimePeriod>,
    #[serde(skip)]
    filename: String,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Default for TimePeriodData {
    fn default() -> Self {
        Self::with_file(DEFAULT_TIME_PERIOD_FILE)
    }
}

impl TimePeriodData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            calendar_display_columns: DEFAULT_CALENDAR_DISPLAY_COLUMNS,
            periods: Vec::new(),
            filename: if filename.is_empty() {
                DEFAULT_TIME_PERIOD_FILE.to_string()
            } else {
                filename
            },
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub(crate) fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    pub fn calendar_display_columns(&self) -> usize {
        if self.calendar_display_columns == 0 {
            DEFAULT_CALENDAR_DISPLAY_COLUMNS
        } else {
            self.calendar_display_columns
        }
    }

    /// Reject any period whose end precedes its start.
    pub fn validate(&self) -> Result<()> {
        self.periods.iter().try_for_each(TimePeriod::validate)
    }

    pub fn all(&self) -> &[TimePeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn add(&mut self, period: TimePeriod) {
        self.periods.push(period);
    }

    pub fn by_key(&self, key: &str) -> Result<&TimePeriod> {
        self.periods
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| DataError::PeriodNotFound(key.to_string()))
    }

    /// The first period containing `date`.
    pub fn by_date(&self, date: NaiveDate) -> Result<&TimePeriod> {
        self.periods
            .iter()
            .find(|p| p.contains(date))
            .ok_or(DataError::NoPeriodForDate(date))
    }

    /// The period containing `date`, or else the one whose start is closest.
    pub fn nearest(&self, date: NaiveDate) -> Result<&TimePeriod> {
        if let Ok(period) = self.by_date(date) {
            return Ok(period);
        }
        self.periods
            .iter()
            .min_by_key(|p| (p.start_date - date).num_days().abs())
            .ok_or(DataError::NoPeriods)
    }

    /// Index of the period with `key`, used for prev/next navigation.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.periods.iter().position(|p| p.key == key)
    }

    /// Periods that start in `year`, in file order.
    pub fn for_year(&self, year: i32) -> Vec<TimePeriod> {
        self.periods
            .iter()
            .filter(|p| p.start_date.year() == year)
            .cloned()
            .collect()
    }
}
