//! Seed data written by `Store::init`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    period_key, AppSettings, BadgeEntry, BadgeEntryData, Event, EventData, Holiday, HolidayData,
    TimePeriod, TimePeriodData, Vacation, VacationData,
};

const QUARTER_YEARS: [i32; 2] = [2025, 2026];

// Quarter label with its first and last (month, day).
const QUARTERS: [(&str, (u32, u32), (u32, u32)); 4] = [
    ("Q1", (1, 1), (3, 31)),
    ("Q2", (4, 1), (6, 30)),
    ("Q3", (7, 1), (9, 30)),
    ("Q4", (10, 1), (12, 31)),
];

// US federal holidays
const HOLIDAYS: &[(&str, (i32, u32, u32))] = &[
    ("New Year's Day", (2025, 1, 1)),
    ("MLK Day", (2025, 1, 20)),
    ("Presidents' Day", (2025, 2, 17)),
    ("Memorial Day", (2025, 5, 26)),
    ("Juneteenth", (2025, 6, 19)),
    ("Independence Day", (2025, 7, 4)),
    ("Labor Day", (2025, 9, 1)),
    ("Columbus Day", (2025, 10, 13)),
    ("Veterans Day", (2025, 11, 11)),
    ("Thanksgiving Day", (2025, 11, 27)),
    ("Christmas Day", (2025, 12, 25)),
    ("New Year's Day", (2026, 1, 1)),
    ("MLK Day", (2026, 1, 19)),
    ("Presidents' Day", (2026, 2, 16)),
    ("Memorial Day", (2026, 5, 25)),
    ("Juneteenth", (2026, 6, 19)),
    ("Independence Day (observed)", (2026, 7, 3)),
    ("Labor Day", (2026, 9, 7)),
    ("Columbus Day", (2026, 10, 12)),
    ("Veterans Day", (2026, 11, 11)),
    ("Thanksgiving Day", (2026, 11, 26)),
    ("Christmas Day", (2026, 12, 25)),
];

fn ymd((y, m, d): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn time_periods() -> TimePeriodData {
    let mut data = TimePeriodData::new();
    for year in QUARTER_YEARS {
        for (name, (sm, sd), (em, ed)) in QUARTERS {
            if let (Some(start), Some(end)) = (ymd((year, sm, sd)), ymd((year, em, ed))) {
                data.add(TimePeriod::new(period_key(name, year), name, start, end));
            }
        }
    }
    data
}

pub fn holidays() -> HolidayData {
    let mut data = HolidayData::new();
    for (name, date) in HOLIDAYS {
        if let Some(date) = ymd(*date) {
            data.add(Holiday::new(*name, date));
        }
    }
    data
}

pub fn badges(settings: &AppSettings, now: NaiveDateTime) -> BadgeEntryData {
    let mut entry = BadgeEntry::office(now.date(), settings.default_office.clone());
    entry.date_time = Some(now);
    let mut data = BadgeEntryData::new();
    data.add(entry);
    data
}

pub fn vacations() -> VacationData {
    let mut data = VacationData::new();
    if let (Some(start), Some(end)) = (ymd((2025, 7, 4)), ymd((2025, 7, 11))) {
        data.add(Vacation::new("Vacation Destination", start, end));
    }
    data
}

pub fn events(today: NaiveDate) -> EventData {
    let mut data = EventData::new();
    data.add(Event::new(today, "Sample event"));
    data
}
