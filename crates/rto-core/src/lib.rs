//! Core library for rto, a return-to-office attendance tracker.
//!
//! This crate holds everything that does not touch the terminal:
//!
//! - `calc`: workday calendar, period statistics engine, compliance
//!   classifier and year aggregation
//! - `models`: periods, badge entries, holidays, vacations, events, settings
//! - `storage`: the file-backed `Store` for a data directory
//! - `backup`: git backup of the data directory

pub mod backup;
pub mod calc;
pub mod error;
pub mod models;
pub mod storage;

pub use calc::{
    build_workday_map, calculate_period_stats, calculate_year_stats, classify, is_weekday,
    ComplianceStatus, PeriodStats, Workday,
};
pub use error::{DataError, Result};
pub use models::{
    AppSettings, BadgeEntry, BadgeEntryData, Event, EventData, Holiday, HolidayData, TimePeriod,
    TimePeriodData, Vacation, VacationData, DATE_FORMAT,
};
pub use storage::{Dataset, Store};
