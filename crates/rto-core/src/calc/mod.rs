//! Attendance calculations.
//!
//! - `workday`: weekday calendar skeleton for a date range
//! - `period_stats`: the statistics engine for a single period
//! - `compliance`: status classification from the engine's counters
//! - `year`: aggregate statistics across a calendar year of periods
//!
//! Everything here is pure: inputs are borrowed, nothing is mutated, and no
//! I/O happens. Dates are compared as plain calendar dates.

pub mod compliance;
pub mod period_stats;
pub mod workday;
pub mod year;

pub use compliance::{classify, ComplianceStatus};
pub use period_stats::{calculate_period_stats, PeriodStats};
pub use workday::{build_workday_map, is_weekday, Workday};
pub use year::{calculate_year_stats, YEAR_PERIOD_NAME};

/// Integer ceiling division for a positive divisor.
pub(crate) fn ceil_div(numerator: i32, divisor: i32) -> i32 {
    debug_assert!(divisor > 0);
    let quotient = numerator.div_euclid(divisor);
    if numerator.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(3150, 100), 32);
        assert_eq!(ceil_div(3100, 100), 31);
        assert_eq!(ceil_div(0, 100), 0);
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-150, 100), -1);
    }
}
