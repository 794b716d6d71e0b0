//! Non-interactive subcommands.
//!
//! Each `run_*` loads what it needs from a `Store` and hands the result to a
//! `write_*` function that renders plain text into any `io::Write`.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use rto_core::backup;
use rto_core::{
    calculate_period_stats, calculate_year_stats, HolidayData, PeriodStats, Store, VacationData,
};

/// Long date format used in reports, e.g. `Jan 2, 2025`.
const REPORT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Initialize the data directory unless it already looks initialized.
/// Reports on stderr so stdout stays clean for reports.
pub fn ensure_initialized(store: &Store) -> Result<()> {
    if !store.needs_init() {
        return Ok(());
    }
    eprintln!(
        "Data directory {} not initialized, creating default data files...",
        store.dir().display()
    );
    store
        .init()
        .with_context(|| format!("Failed to initialize {}", store.dir().display()))?;
    Ok(())
}

pub fn run_init(store: &Store, out: &mut impl Write) -> Result<()> {
    let created = store
        .init()
        .with_context(|| format!("Failed to initialize {}", store.dir().display()))?;
    if created.is_empty() {
        writeln!(out, "All data files already exist in {}", store.dir().display())?;
    } else {
        writeln!(out, "Initialized {}:", store.dir().display())?;
        for file in created {
            writeln!(out, "  created {}", file)?;
        }
    }
    Ok(())
}

/// Statistics for `period_key`, or for the period containing `today`.
pub fn run_stats(
    store: &Store,
    period_key: Option<&str>,
    json: bool,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let data = store.load_all(0).context("Failed to load data")?;
    let period = match period_key {
        Some(key) => data
            .periods
            .by_key(key)
            .with_context(|| format!("Run 'rto init' or check {}", data.periods.filename()))?,
        None => data
            .periods
            .by_date(today)
            .context("Pass a period key to choose one explicitly")?,
    };
    debug!(period = %period.key, "Calculating period stats");

    let stats = calculate_period_stats(
        period,
        &data.badges,
        &data.holidays,
        &data.vacations,
        data.settings.goal,
        Some(today),
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &stats)?;
        writeln!(out)?;
    } else {
        write_stats(&stats, data.settings.goal, out)?;
    }
    Ok(())
}

/// Aggregate statistics for periods starting in `year` (default: this year).
pub fn run_year(
    store: &Store,
    year: Option<i32>,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let data = store.load_all(0).context("Failed to load data")?;
    let year = year.unwrap_or_else(|| today.year());
    let periods = data.periods.for_year(year);

    let per_period: Vec<PeriodStats> = periods
        .iter()
        .map(|p| {
            calculate_period_stats(
                p,
                &data.badges,
                &data.holidays,
                &data.vacations,
                data.settings.goal,
                Some(today),
            )
        })
        .collect();
    let total = calculate_year_stats(
        &periods,
        &data.badges,
        &data.holidays,
        &data.vacations,
        data.settings.goal,
        Some(today),
    );

    write_year(year, total.as_ref(), &per_period, out)?;
    Ok(())
}

pub fn run_holidays(store: &Store, out: &mut impl Write) -> Result<()> {
    let holidays = store.load_holidays().context("Failed to load holidays")?;
    write_holidays(&holidays, out)?;
    Ok(())
}

pub fn run_vacations(store: &Store, out: &mut impl Write) -> Result<()> {
    let vacations = store.load_vacations().context("Failed to load vacations")?;
    write_vacations(&vacations, out)?;
    Ok(())
}

pub fn run_backup(dir: &Path, remote: Option<&str>, out: &mut impl Write) -> Result<()> {
    info!(dir = %dir.display(), "Running git backup");
    let outcome = backup::perform(dir, remote);
    if outcome.is_error {
        anyhow::bail!("Backup failed: {}", outcome.message);
    }
    writeln!(out, "{}", outcome.message)?;

    let status = backup::status(dir);
    if let Some(last) = status.last_commit {
        let remote = if status.has_remote { "origin" } else { "no remote" };
        writeln!(out, "Last commit: {} ({})", last, remote)?;
    }
    if !status.clean {
        writeln!(
            out,
            "Warning: {} modified, {} untracked files not committed",
            status.modified, status.untracked
        )?;
    }
    Ok(())
}

pub fn write_stats(stats: &PeriodStats, goal_pct: i32, w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "Period: {}  ({} - {})",
        stats.name,
        stats.start_date.format(REPORT_DATE_FORMAT),
        stats.end_date.format(REPORT_DATE_FORMAT),
    )?;

    writeln!(w)?;
    writeln!(w, "  Status:               {}", stats.compliance_status)?;
    writeln!(w, "  Days ahead of pace:   {:+}", stats.days_ahead_of_pace)?;
    if stats.remaining_missable_days >= 0 {
        writeln!(w, "  Skippable days left:  {}", stats.remaining_missable_days)?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "  Required badge-ins:   {} of {} total days ({}%)",
        stats.days_required, stats.total_days, goal_pct
    )?;
    writeln!(w, "  Badged in:            {}", stats.days_badged_in)?;
    writeln!(w, "  Still needed:         {}", stats.days_still_needed)?;

    writeln!(w)?;
    writeln!(
        w,
        "  Badge-ins:            {}  ({} office, {} flex)",
        stats.days_badged_in,
        stats.office_days(),
        stats.flex_days
    )?;

    writeln!(w)?;
    writeln!(w, "  Days worked so far:   {}", stats.days_thus_far)?;
    writeln!(w, "  Days remaining:       {}", stats.days_left)?;
    if stats.days_thus_far > 0 {
        writeln!(w, "  Current average:      {:.1}%", stats.current_average * 100.0)?;
    }
    if stats.days_left > 0 && stats.days_still_needed > 0 {
        writeln!(
            w,
            "  Rate needed:          {:.1}%",
            stats.required_future_average * 100.0
        )?;
    }

    if let Some(date) = stats.projected_completion_date {
        writeln!(w)?;
        writeln!(w, "  Projected completion: {}", date.format(REPORT_DATE_FORMAT))?;
    }

    writeln!(w)?;
    writeln!(w, "  Holidays:             {}", stats.holidays)?;
    writeln!(w, "  Vacation days:        {}", stats.vacation_days)?;
    writeln!(w, "  Days off (remote):    {}", stats.days_off)?;
    writeln!(w, "  Available workdays:   {}", stats.available_workdays)?;
    Ok(())
}

pub fn write_year(
    year: i32,
    total: Option<&PeriodStats>,
    per_period: &[PeriodStats],
    w: &mut impl Write,
) -> io::Result<()> {
    let Some(total) = total else {
        return writeln!(w, "No time periods start in {}.", year);
    };

    writeln!(w, "Year {}", year)?;
    writeln!(w)?;
    writeln!(
        w,
        "{:<10}  {:<12}  {:>7}  {:>8}  {:>6}  {:>5}",
        "Period", "Status", "Badged", "Required", "Needed", "Pace"
    )?;
    writeln!(
        w,
        "{:<10}  {:<12}  {:>7}  {:>8}  {:>6}  {:>5}",
        "----------", "------------", "-------", "--------", "------", "-----"
    )?;
    for stats in per_period.iter().chain(std::iter::once(total)) {
        writeln!(
            w,
            "{:<10}  {:<12}  {:>7}  {:>8}  {:>6}  {:>+5}",
            stats.key,
            stats.compliance_status.to_string(),
            stats.days_badged_in,
            stats.days_required,
            stats.days_still_needed,
            stats.days_ahead_of_pace
        )?;
    }
    Ok(())
}

pub fn write_holidays(holidays: &HolidayData, w: &mut impl Write) -> io::Result<()> {
    if holidays.is_empty() {
        return writeln!(w, "No holidays recorded.");
    }

    writeln!(w, "{:<12}  {}", "Date", "Name")?;
    writeln!(w, "{:<12}  {}", "------------", "------------------------------")?;
    for h in holidays.all() {
        writeln!(w, "{:<12}  {}", h.date.to_string(), h.name)?;
    }
    Ok(())
}

pub fn write_vacations(vacations: &VacationData, w: &mut impl Write) -> io::Result<()> {
    if vacations.is_empty() {
        return writeln!(w, "No vacations recorded.");
    }

    writeln!(
        w,
        "{:<4}  {:<30}  {:<12}  {:<12}  {}",
        "#", "Destination", "Start", "End", "Approved"
    )?;
    writeln!(
        w,
        "{:<4}  {:<30}  {:<12}  {:<12}  {}",
        "----", "------------------------------", "------------", "------------", "--------"
    )?;
    for (i, v) in vacations.all().iter().enumerate() {
        writeln!(
            w,
            "{:<4}  {:<30}  {:<12}  {:<12}  {}",
            i + 1,
            truncate(&v.destination, 30),
            v.start_date.to_string(),
            v.end_date.to_string(),
            if v.approved { "Yes" } else { "No" }
        )?;
    }
    Ok(())
}

/// Shorten to `max_len` characters, ending in "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rto_core::{BadgeEntry, BadgeEntryData, Holiday, TimePeriod, Vacation, DATE_FORMAT};
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    fn sample_stats() -> PeriodStats {
        let period = TimePeriod::new("Q1_2025", "Q1", date("2025-01-01"), date("2025-03-31"));
        let mut badges = BadgeEntryData::new();
        badges.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        badges.add(BadgeEntry::office(date("2025-01-03"), "HQ"));
        badges.add(BadgeEntry::flex(date("2025-01-06"), "Flex Credit"));
        let mut holidays = HolidayData::new();
        holidays.add(Holiday::new("New Year's Day", date("2025-01-01")));
        let mut vacations = VacationData::new();
        vacations.add(Vacation::new("Beach", date("2025-02-03"), date("2025-02-07")));
        calculate_period_stats(
            &period,
            &badges,
            &holidays,
            &vacations,
            60,
            Some(date("2025-01-08")),
        )
    }

    // -------------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------------

    #[test]
    fn test_write_stats_sections() {
        let stats = sample_stats();
        let text = output(|w| write_stats(&stats, 60, w).unwrap());

        assert!(text.starts_with("Period: Q1  (Jan 1, 2025 - Mar 31, 2025)"));
        assert!(text.contains("Status:"));
        assert!(text.contains("(60%)"));
        assert!(text.contains("Badge-ins:            3  (2 office, 1 flex)"));
        assert!(text.contains("Holidays:             1"));
        assert!(text.contains("Vacation days:        5"));
        assert!(text.contains("Current average:"));
        assert!(text.contains("Rate needed:"));
    }

    #[test]
    fn test_write_stats_hides_average_before_start() {
        let mut stats = sample_stats();
        stats.days_thus_far = 0;
        stats.projected_completion_date = None;
        let text = output(|w| write_stats(&stats, 50, w).unwrap());
        assert!(!text.contains("Current average:"));
        assert!(!text.contains("Projected completion:"));
    }

    #[test]
    fn test_write_stats_projected_completion() {
        let mut stats = sample_stats();
        stats.projected_completion_date = Some(date("2025-03-08"));
        let text = output(|w| write_stats(&stats, 50, w).unwrap());
        assert!(text.contains("Projected completion: Mar 8, 2025"));
    }

    #[test]
    fn test_write_stats_hides_negative_skippable() {
        let mut stats = sample_stats();
        stats.remaining_missable_days = -2;
        let text = output(|w| write_stats(&stats, 50, w).unwrap());
        assert!(!text.contains("Skippable days left"));
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    #[test]
    fn test_write_holidays() {
        let empty = output(|w| write_holidays(&HolidayData::new(), w).unwrap());
        assert_eq!(empty, "No holidays recorded.\n");

        let mut holidays = HolidayData::new();
        holidays.add(Holiday::new("Labor Day", date("2025-09-01")));
        let text = output(|w| write_holidays(&holidays, w).unwrap());
        assert!(text.starts_with("Date"));
        assert!(text.contains("2025-09-01    Labor Day"));
    }

    #[test]
    fn test_write_vacations() {
        let empty = output(|w| write_vacations(&VacationData::new(), w).unwrap());
        assert_eq!(empty, "No vacations recorded.\n");

        let mut vacations = VacationData::new();
        let mut v = Vacation::new("Lake", date("2025-07-04"), date("2025-07-11"));
        v.approved = false;
        vacations.add(v);
        let text = output(|w| write_vacations(&vacations, w).unwrap());
        let row = text.lines().nth(2).unwrap();
        assert!(row.starts_with("1 "));
        assert!(row.contains("Lake"));
        assert!(row.ends_with("No"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    // -------------------------------------------------------------------------
    // Runs against a data directory
    // -------------------------------------------------------------------------

    #[test]
    fn test_run_stats_by_key_and_today() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.init().unwrap();

        let text = output(|w| run_stats(&store, Some("Q2_2025"), false, date("2025-05-01"), w).unwrap());
        assert!(text.starts_with("Period: Q2"));

        let text = output(|w| run_stats(&store, None, false, date("2025-08-15"), w).unwrap());
        assert!(text.starts_with("Period: Q3"));
    }

    #[test]
    fn test_run_stats_json() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.init().unwrap();

        let text = output(|w| run_stats(&store, Some("Q1_2025"), true, date("2025-05-01"), w).unwrap());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["key"], "Q1_2025");
        assert_eq!(value["total_days"], 61);
        assert_eq!(value["holidays"], 3);
    }

    #[test]
    fn test_run_stats_unknown_period() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.init().unwrap();

        let mut buf = Vec::new();
        let err = run_stats(&store, Some("Q9_2099"), false, date("2025-05-01"), &mut buf)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Q9_2099"));
    }

    #[test]
    fn test_run_year() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.init().unwrap();

        let text = output(|w| run_year(&store, Some(2025), date("2025-05-01"), w).unwrap());
        assert!(text.starts_with("Year 2025"));
        assert!(text.contains("Q1_2025"));
        assert!(text.contains("Q4_2025"));
        assert!(text.contains("Year "));

        let none = output(|w| run_year(&store, Some(2030), date("2025-05-01"), w).unwrap());
        assert_eq!(none, "No time periods start in 2030.\n");
    }

    #[test]
    fn test_run_init_reports_created_files() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("data"));
        let first = output(|w| run_init(&store, w).unwrap());
        assert!(first.contains("created settings.yaml"));
        let second = output(|w| run_init(&store, w).unwrap());
        assert!(second.starts_with("All data files already exist"));
    }

    #[test]
    fn test_ensure_initialized() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("data"));
        assert!(store.needs_init());
        ensure_initialized(&store).unwrap();
        assert!(!store.needs_init());
    }

    #[test]
    fn test_run_backup_commits_data_dir() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.init().unwrap();

        let text = output(|w| run_backup(store.dir(), None, w).unwrap());
        assert!(text.starts_with("Backup committed (no remote configured)"));
        assert!(text.contains("Last commit: backup: "));
        assert!(!text.contains("Warning"));

        let again = output(|w| run_backup(store.dir(), None, w).unwrap());
        assert!(again.starts_with("Nothing to commit"));
    }
}
