use std::collections::BTreeMap;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use super::compliance::{classify, ComplianceStatus};
use super::workday::{build_workday_map, Workday};
use super::ceil_div;
use crate::models::{BadgeEntryData, HolidayData, TimePeriod, VacationData, DATE_FORMAT};

/// Derived statistics for one period.
///
/// Counts are `i32` so signed quantities (pace, missable days, days off) read
/// naturally next to the unsigned-in-practice ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub key: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    // Counts
    pub days_badged_in: i32,
    pub flex_days: i32,
    /// Qualifying days strictly before today.
    pub days_thus_far: i32,
    pub days_left: i32,
    /// Qualifying days: weekdays that are neither holiday nor vacation.
    pub total_days: i32,
    /// Weekdays in range, holidays included.
    pub available_workdays: i32,
    pub total_calendar_days: i32,

    // Requirements
    pub days_required: i32,
    /// Never negative.
    pub days_still_needed: i32,
    pub days_off: i32,
    pub holidays: i32,
    pub vacation_days: i32,
    pub days_ahead_of_pace: i32,
    /// Negative once the goal can no longer be met.
    pub remaining_missable_days: i32,

    // Rates
    pub current_average: f64,
    pub required_future_average: f64,

    pub compliance_status: ComplianceStatus,

    /// Only set while days are still needed and a badge rate exists.
    pub projected_completion_date: Option<NaiveDate>,

    pub workdays: BTreeMap<NaiveDate, Workday>,
}

impl PeriodStats {
    /// Badge-ins that were physical office days rather than flex credit.
    pub fn office_days(&self) -> i32 {
        self.days_badged_in - self.flex_days
    }

    pub fn workday(&self, date: NaiveDate) -> Option<&Workday> {
        self.workdays.get(&date)
    }

    /// Look up a day by its `YYYY-MM-DD` key.
    pub fn workday_by_key(&self, key: &str) -> Option<&Workday> {
        NaiveDate::parse_from_str(key, DATE_FORMAT)
            .ok()
            .and_then(|d| self.workdays.get(&d))
    }
}

#[derive(Default)]
struct Counters {
    available_workdays: i32,
    total_days: i32,
    days_badged_in: i32,
    flex_days: i32,
    days_thus_far: i32,
    holidays: i32,
    vacation_days: i32,
}

/// Compute statistics for `period`.
///
/// `goal_pct` is the required office percentage (50 means 50%). Defaulting a
/// zero or negative goal is the caller's job. `today` overrides the current
/// local date.
///
/// Per weekday: a holiday short-circuits everything else, then a vacation day
/// does the same. Remaining days qualify. Qualifying days before today count
/// as elapsed. Badge-ins count for every qualifying day, including today and
/// pre-recorded future days.
pub fn calculate_period_stats(
    period: &TimePeriod,
    badges: &BadgeEntryData,
    holidays: &HolidayData,
    vacations: &VacationData,
    goal_pct: i32,
    today: Option<NaiveDate>,
) -> PeriodStats {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let start = period.start_date;
    let end = period.end_date;

    let mut workdays = build_workday_map(start, end);

    let badge_map = badges.badge_map(start, end);
    let holiday_map = holidays.holiday_map();
    let vacation_map = vacations.vacation_map();

    let total_calendar_days = if end >= start {
        (end - start).num_days() as i32 + 1
    } else {
        0
    };

    let mut c = Counters::default();

    for (date, wd) in workdays.iter_mut() {
        if holiday_map.contains_key(date) {
            wd.is_holiday = true;
            c.holidays += 1;
            c.available_workdays += 1;
            continue;
        }

        c.available_workdays += 1;

        if vacation_map.contains_key(date) {
            wd.is_vacation = true;
            c.vacation_days += 1;
            continue;
        }

        c.total_days += 1;

        // Today and later are never elapsed, but their badge-ins still count
        if *date < today {
            c.days_thus_far += 1;
        }

        if let Some(entry) = badge_map.get(date).filter(|e| e.is_badged_in) {
            wd.is_badged_in = true;
            c.days_badged_in += 1;
            if entry.is_flex_credit {
                wd.is_flex_credit = true;
                c.flex_days += 1;
            }
        }
    }

    let days_left = c.total_days - c.days_thus_far;
    let days_required = ceil_div(c.total_days * goal_pct, 100);
    let days_still_needed = (days_required - c.days_badged_in).max(0);
    let days_off = c.days_thus_far - c.days_badged_in;

    // Ties round away from zero
    let days_ahead_of_pace = if c.days_thus_far > 0 && c.total_days > 0 {
        let expected = (f64::from(c.days_thus_far) * f64::from(days_required)
            / f64::from(c.total_days))
        .round() as i32;
        c.days_badged_in - expected
    } else {
        0
    };

    let remaining_missable_days = days_left - days_still_needed;

    let current_average = if c.days_thus_far > 0 {
        f64::from(c.days_badged_in) / f64::from(c.days_thus_far)
    } else {
        0.0
    };

    let required_future_average = if days_left > 0 {
        f64::from(days_still_needed) / f64::from(days_left)
    } else {
        0.0
    };

    let compliance_status = classify(
        c.days_badged_in,
        days_required,
        days_ahead_of_pace,
        days_still_needed,
        days_left,
    );

    let projected_completion_date = project_completion(
        today,
        c.days_badged_in,
        c.days_thus_far,
        days_still_needed,
    );

    PeriodStats {
        key: period.key.clone(),
        name: period.name.clone(),
        start_date: start,
        end_date: end,
        days_badged_in: c.days_badged_in,
        flex_days: c.flex_days,
        days_thus_far: c.days_thus_far,
        days_left,
        total_days: c.total_days,
        available_workdays: c.available_workdays,
        total_calendar_days,
        days_required,
        days_still_needed,
        days_off,
        holidays: c.holidays,
        vacation_days: c.vacation_days,
        days_ahead_of_pace,
        remaining_missable_days,
        current_average,
        required_future_average,
        compliance_status,
        projected_completion_date,
        workdays,
    }
}

/// Calendar date the goal is reached at the current badge rate
/// (`days_badged_in / days_thus_far`), counted forward from today.
fn project_completion(
    today: NaiveDate,
    days_badged_in: i32,
    days_thus_far: i32,
    days_still_needed: i32,
) -> Option<NaiveDate> {
    if days_badged_in <= 0 || days_thus_far <= 0 || days_still_needed <= 0 {
        return None;
    }
    // ceil(still_needed / (badged / thus_far)) without floating point
    let estimated_days = ceil_div(days_still_needed * days_thus_far, days_badged_in);
    today.checked_add_days(Days::new(estimated_days as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::is_weekday;
    use crate::models::{BadgeEntry, Holiday, Vacation};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn make_q1() -> TimePeriod {
        TimePeriod::new("Q1_2025", "Q1", date("2025-01-01"), date("2025-03-31"))
    }

    fn empty_data() -> (BadgeEntryData, HolidayData, VacationData) {
        (BadgeEntryData::new(), HolidayData::new(), VacationData::new())
    }

    fn badge_range(badges: &mut BadgeEntryData, from: &str, to: &str) {
        for d in date(from).iter_days().take_while(|d| *d <= date(to)) {
            if is_weekday(d) {
                badges.add(BadgeEntry::office(d, "HQ"));
            }
        }
    }

    fn stats_at(
        badges: &BadgeEntryData,
        holidays: &HolidayData,
        vacations: &VacationData,
        goal: i32,
        today: &str,
    ) -> PeriodStats {
        calculate_period_stats(&make_q1(), badges, holidays, vacations, goal, Some(date(today)))
    }

    #[test]
    fn test_no_badges_on_first_day() {
        let (badges, holidays, vacations) = empty_data();
        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-01");

        assert_eq!(stats.days_badged_in, 0);
        assert_eq!(stats.days_thus_far, 0);
        assert_eq!(stats.days_ahead_of_pace, 0);
        assert_eq!(stats.compliance_status, ComplianceStatus::OnTrack);
        assert_eq!(stats.projected_completion_date, None);
    }

    #[test]
    fn test_calendar_counts_for_q1() {
        let (badges, holidays, vacations) = empty_data();
        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-01");

        assert_eq!(stats.total_calendar_days, 90);
        assert_eq!(stats.available_workdays, 64);
        assert_eq!(stats.total_days, 64);
        assert_eq!(stats.days_required, 32);
        assert_eq!(stats.days_left, 64);
        assert_eq!(stats.workdays.len(), 64);
        assert_eq!(stats.key, "Q1_2025");
        assert_eq!(stats.name, "Q1");
    }

    #[test]
    fn test_impossible_at_end_of_quarter() {
        let (badges, mut holidays, vacations) = empty_data();
        holidays.add(Holiday::new("New Year's Day", date("2025-01-01")));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-03-31");

        assert_eq!(stats.total_days, 63);
        assert_eq!(stats.days_required, 32);
        assert_eq!(stats.days_badged_in, 0);
        // 2025-03-31 is today, so it is the only day left
        assert_eq!(stats.days_thus_far, 62);
        assert_eq!(stats.days_left, 1);
        assert_eq!(stats.days_still_needed, 32);
        assert!(stats.remaining_missable_days < 0);
        assert_eq!(stats.compliance_status, ComplianceStatus::Impossible);
    }

    #[test]
    fn test_achieved_status() {
        let (mut badges, mut holidays, vacations) = empty_data();
        holidays.add(Holiday::new("New Year's Day", date("2025-01-01")));
        badge_range(&mut badges, "2025-01-02", "2025-02-28");

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-03-31");

        assert_eq!(stats.days_badged_in, 42);
        assert_eq!(stats.compliance_status, ComplianceStatus::Achieved);
        assert_eq!(stats.days_still_needed, 0);
        assert_eq!(stats.projected_completion_date, None);
    }

    #[test]
    fn test_on_track_status() {
        let (mut badges, mut holidays, vacations) = empty_data();
        holidays.add(Holiday::new("New Year's Day", date("2025-01-01")));
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        badges.add(BadgeEntry::office(date("2025-01-03"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-03");

        assert_eq!(stats.days_thus_far, 1);
        assert_eq!(stats.days_badged_in, 2);
        assert!(stats.days_ahead_of_pace > 0);
        assert_eq!(stats.compliance_status, ComplianceStatus::OnTrack);
    }

    #[test]
    fn test_at_risk_status_and_half_rounds_up() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-14");

        // 9 elapsed days * 32 required / 64 qualifying = 4.5 expected, rounds to 5
        assert_eq!(stats.days_thus_far, 9);
        assert_eq!(stats.days_ahead_of_pace, -4);
        assert_eq!(stats.compliance_status, ComplianceStatus::AtRisk);
    }

    #[test]
    fn test_flex_credit_counting() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        badges.add(BadgeEntry::flex(date("2025-01-03"), "Flex"));
        badges.add(BadgeEntry::flex(date("2025-01-06"), "Flex"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-06");

        assert_eq!(stats.days_badged_in, 3);
        assert_eq!(stats.flex_days, 2);
        assert_eq!(stats.office_days(), 1);
        assert!(stats.workday(date("2025-01-03")).unwrap().is_flex_credit);
    }

    #[test]
    fn test_unbadged_entry_is_ignored() {
        let (mut badges, holidays, vacations) = empty_data();
        let mut entry = BadgeEntry::office(date("2025-01-02"), "HQ");
        entry.is_badged_in = false;
        badges.add(entry);

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-06");
        assert_eq!(stats.days_badged_in, 0);
        assert!(!stats.workday(date("2025-01-02")).unwrap().is_badged_in);
    }

    #[test]
    fn test_holidays_excluded_from_total() {
        let (badges, mut holidays, vacations) = empty_data();
        holidays.add(Holiday::new("New Year", date("2025-01-01")));
        holidays.add(Holiday::new("MLK Day", date("2025-01-20")));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-31");

        assert_eq!(stats.holidays, 2);
        assert_eq!(stats.available_workdays, 64);
        assert_eq!(stats.total_days, stats.available_workdays - 2);
    }

    #[test]
    fn test_vacation_days_excluded_from_total() {
        let (badges, holidays, mut vacations) = empty_data();
        vacations.add(Vacation::new("Beach", date("2025-01-06"), date("2025-01-10")));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-31");

        assert_eq!(stats.vacation_days, 5);
        assert_eq!(stats.total_days, stats.available_workdays - stats.vacation_days);
    }

    #[test]
    fn test_holiday_takes_precedence_over_vacation() {
        let (badges, mut holidays, mut vacations) = empty_data();
        holidays.add(Holiday::new("New Year", date("2025-01-01")));
        vacations.add(Vacation::new("Ski trip", date("2024-12-30"), date("2025-01-03")));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-31");

        assert_eq!(stats.holidays, 1);
        assert_eq!(stats.vacation_days, 2);
        let new_year = stats.workday(date("2025-01-01")).unwrap();
        assert!(new_year.is_holiday);
        assert!(!new_year.is_vacation);
    }

    #[test]
    fn test_badge_on_holiday_is_not_counted() {
        let (mut badges, mut holidays, vacations) = empty_data();
        holidays.add(Holiday::new("MLK Day", date("2025-01-20")));
        badges.add(BadgeEntry::office(date("2025-01-20"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-31");
        assert_eq!(stats.days_badged_in, 0);
    }

    #[test]
    fn test_days_required_follows_goal() {
        let (badges, holidays, vacations) = empty_data();
        let stats50 = stats_at(&badges, &holidays, &vacations, 50, "2025-03-31");
        let stats75 = stats_at(&badges, &holidays, &vacations, 75, "2025-03-31");
        let stats60 = stats_at(&badges, &holidays, &vacations, 60, "2025-03-31");

        assert_eq!(stats50.days_required, 32);
        assert_eq!(stats75.days_required, 48);
        // 64 * 0.6 = 38.4, rounded up
        assert_eq!(stats60.days_required, 39);
    }

    #[test]
    fn test_today_badge_does_not_increase_days_thus_far() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        badges.add(BadgeEntry::office(date("2025-01-03"), "HQ"));

        let before = stats_at(&badges, &holidays, &vacations, 50, "2025-01-06");
        badges.add(BadgeEntry::office(date("2025-01-06"), "HQ"));
        let after = stats_at(&badges, &holidays, &vacations, 50, "2025-01-06");

        assert_eq!(after.days_thus_far, before.days_thus_far);
        assert_eq!(after.days_badged_in, before.days_badged_in + 1);
    }

    #[test]
    fn test_future_badge_counts_but_is_not_elapsed() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-02-03"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-06");

        assert_eq!(stats.days_badged_in, 1);
        assert_eq!(stats.days_thus_far, 3);
        assert!(stats.workday(date("2025-02-03")).unwrap().is_badged_in);
    }

    #[test]
    fn test_pace_and_projection() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        badges.add(BadgeEntry::office(date("2025-01-06"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-07");

        assert_eq!(stats.days_thus_far, 4);
        assert_eq!(stats.days_left, 60);
        assert_eq!(stats.days_still_needed, 30);
        assert_eq!(stats.days_off, 2);
        assert_eq!(stats.remaining_missable_days, 30);
        assert!((stats.current_average - 0.5).abs() < f64::EPSILON);
        assert!((stats.required_future_average - 0.5).abs() < f64::EPSILON);
        // 30 needed at 2 per 4 days = 60 calendar days from today
        assert_eq!(stats.projected_completion_date, Some(date("2025-03-08")));
    }

    #[test]
    fn test_no_projection_without_elapsed_days() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::office(date("2025-01-01"), "HQ"));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-01");
        assert_eq!(stats.days_badged_in, 1);
        assert_eq!(stats.days_thus_far, 0);
        assert_eq!(stats.projected_completion_date, None);
        assert_eq!(stats.current_average, 0.0);
    }

    #[test]
    fn test_projected_nil_when_achieved() {
        let (mut badges, holidays, vacations) = empty_data();
        badge_range(&mut badges, "2025-01-01", "2025-03-31");

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-03-31");
        assert_eq!(stats.compliance_status, ComplianceStatus::Achieved);
        assert_eq!(stats.projected_completion_date, None);
    }

    #[test]
    fn test_workday_records() {
        let (mut badges, mut holidays, mut vacations) = empty_data();
        holidays.add(Holiday::new("New Year", date("2025-01-01")));
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        vacations.add(Vacation::new("A", date("2025-01-06"), date("2025-01-06")));

        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-07");

        assert!(stats.workday_by_key("2025-01-01").unwrap().is_holiday);
        assert!(stats.workday_by_key("2025-01-02").unwrap().is_badged_in);
        assert!(stats.workday_by_key("2025-01-06").unwrap().is_vacation);
        assert!(stats.workday_by_key("2025-01-04").is_none());
        assert!(stats.workday_by_key("not-a-date").is_none());
    }

    #[test]
    fn test_zero_goal_is_trivially_achieved() {
        let (badges, holidays, vacations) = empty_data();
        let stats = stats_at(&badges, &holidays, &vacations, 0, "2025-02-03");
        assert_eq!(stats.days_required, 0);
        assert_eq!(stats.compliance_status, ComplianceStatus::Achieved);
    }

    #[test]
    fn test_idempotent() {
        let (mut badges, mut holidays, mut vacations) = empty_data();
        holidays.add(Holiday::new("New Year", date("2025-01-01")));
        vacations.add(Vacation::new("Beach", date("2025-02-10"), date("2025-02-14")));
        badge_range(&mut badges, "2025-01-06", "2025-01-17");

        let first = stats_at(&badges, &holidays, &vacations, 50, "2025-02-20");
        let second = stats_at(&badges, &holidays, &vacations, 50, "2025-02-20");
        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_with_date_keys() {
        let (mut badges, holidays, vacations) = empty_data();
        badges.add(BadgeEntry::flex(date("2025-01-02"), "Flex"));
        let stats = stats_at(&badges, &holidays, &vacations, 50, "2025-01-07");

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["compliance_status"], "At Risk");
        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["workdays"]["2025-01-02"]["is_flex_credit"], true);
    }

    proptest::proptest! {
        #[test]
        fn prop_counts_partition_and_repeat(
            badged in proptest::collection::vec(0u64..90, 0..60),
            today_offset in 0u64..100,
            goal in 1i32..=100,
        ) {
            let mut badges = BadgeEntryData::new();
            for offset in badged {
                badges.add(BadgeEntry::office(date("2025-01-01") + Days::new(offset), "HQ"));
            }
            let mut holidays = HolidayData::new();
            holidays.add(Holiday::new("MLK Day", date("2025-01-20")));
            let mut vacations = VacationData::new();
            vacations.add(Vacation::new("Ski", date("2025-02-24"), date("2025-02-28")));
            let today = Some(date("2025-01-01") + Days::new(today_offset));

            let first = calculate_period_stats(&make_q1(), &badges, &holidays, &vacations, goal, today);
            let second = calculate_period_stats(&make_q1(), &badges, &holidays, &vacations, goal, today);
            proptest::prop_assert_eq!(&first, &second);

            proptest::prop_assert_eq!(first.days_thus_far + first.days_left, first.total_days);
            proptest::prop_assert_eq!(
                first.available_workdays,
                first.total_days + first.holidays + first.vacation_days
            );
            proptest::prop_assert!(first.days_badged_in <= first.total_days);
            proptest::prop_assert!(first.days_still_needed >= 0);
        }
    }
}
