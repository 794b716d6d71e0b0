use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calc::is_weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacation {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub approved: bool,
}

impl Vacation {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            approved: true,
        }
    }

    /// Weekdays covered by this vacation. Holidays are not excluded here.
    pub fn weekdays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
            .filter(|d| is_weekday(*d))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationData {
    #[serde(default)]
    vacations: Vec<Vacation>,
}

impl VacationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vacation: Vacation) {
        self.vacations.push(vacation);
    }

    /// Remove vacations matching both dates. Returns true if anything was removed.
    pub fn remove(&mut self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        let before = self.vacations.len();
        self.vacations
            .retain(|v| !(v.start_date == start_date && v.end_date == end_date));
        self.vacations.len() != before
    }

    pub fn all(&self) -> &[Vacation] {
        &self.vacations
    }

    pub fn len(&self) -> usize {
        self.vacations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vacations.is_empty()
    }

    /// Every vacation expanded to its individual weekday dates.
    pub fn vacation_map(&self) -> HashMap<NaiveDate, &Vacation> {
        self.vacations
            .iter()
            .flat_map(|v| v.weekdays().map(move |d| (d, v)))
            .collect()
    }
}
