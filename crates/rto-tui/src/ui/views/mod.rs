//! View-specific content rendering.

pub mod calendar;
pub mod holidays;
pub mod settings;
pub mod stats;
pub mod vacations;
pub mod year;
