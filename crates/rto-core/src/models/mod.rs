//! Data models for attendance tracking.
//!
//! - `TimePeriod`, `TimePeriodData`: named date ranges (fiscal quarters etc.)
//! - `BadgeEntry`, `BadgeEntryData`: office and flex-credit badge-ins
//! - `Holiday`, `HolidayData`: days off that reduce the requirement
//! - `Vacation`, `VacationData`: personal leave ranges
//! - `Event`, `EventData`: free-text calendar notes
//! - `AppSettings`: goal percentage, office labels, period files
//!
//! Dates are `chrono::NaiveDate` and serialize as `YYYY-MM-DD`, so malformed
//! dates are rejected when a file is loaded.

pub mod badge;
pub mod event;
pub mod holiday;
pub mod period;
pub mod settings;
pub mod vacation;

pub use badge::{BadgeEntry, BadgeEntryData};
pub use event::{Event, EventData};
pub use holiday::{Holiday, HolidayData};
pub use period::{period_key, TimePeriod, TimePeriodData};
pub use settings::AppSettings;
pub use vacation::{Vacation, VacationData};

/// Canonical date key format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
