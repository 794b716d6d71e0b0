use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
}

impl Holiday {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayData {
    #[serde(default)]
    holidays: Vec<Holiday>,
}

impl HolidayData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping date order.
    pub fn add(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
        self.holidays.sort_by_key(|h| h.date);
    }

    pub(crate) fn sort(&mut self) {
        self.holidays.sort_by_key(|h| h.date);
    }

    /// Remove holidays on `date`. Returns true if anything was removed.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.date != date);
        self.holidays.len() != before
    }

    pub fn all(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }

    pub fn holiday_map(&self) -> HashMap<NaiveDate, &Holiday> {
        self.holidays.iter().map(|h| (h.date, h)).collect()
    }
}
