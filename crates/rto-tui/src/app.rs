//! Application state for the interactive calendar.
//!
//! `App` owns the loaded dataset, the selected day and period, and the
//! statistics derived from them. Every mutation goes through a method here
//! that recomputes the statistics before returning. Text entry (events,
//! vacations, holidays, settings) goes through a `Form` overlay.

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info, warn};

use rto_core::backup;
use rto_core::{
    calculate_period_stats, calculate_year_stats, is_weekday, AppSettings, BadgeEntryData,
    Dataset, Event, Holiday, PeriodStats, Store, TimePeriod, Vacation, DATE_FORMAT,
};

// ============================================================================
// UI State Types
// ============================================================================

/// Main views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calendar,
    Vacations,
    Holidays,
    Year,
    Settings,
}

/// Overlay / lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    /// A `Form` overlay has the keyboard.
    Editing,
    SearchingEvents,
    Quitting,
}

/// Settings editable from the options view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    DefaultOffice,
    FlexCredit,
    Goal,
}

impl SettingField {
    pub const ALL: [SettingField; 3] = [
        SettingField::DefaultOffice,
        SettingField::FlexCredit,
        SettingField::Goal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingField::DefaultOffice => "Default office",
            SettingField::FlexCredit => "Flex credit label",
            SettingField::Goal => "Goal (%)",
        }
    }

    pub fn value(self, settings: &AppSettings) -> String {
        match self {
            SettingField::DefaultOffice => settings.default_office.clone(),
            SettingField::FlexCredit => settings.flex_credit.clone(),
            SettingField::Goal => settings.goal.to_string(),
        }
    }

    fn form_labels(self) -> &'static [&'static str] {
        match self {
            SettingField::DefaultOffice => &["Default office"],
            SettingField::FlexCredit => &["Flex credit label"],
            SettingField::Goal => &["Goal (1-100)"],
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

const EVENT_LABELS: &[&str] = &["Description"];
const VACATION_LABELS: &[&str] = &[
    "Destination",
    "Start (YYYY-MM-DD)",
    "End (YYYY-MM-DD)",
    "Approved (y/n)",
];
const HOLIDAY_LABELS: &[&str] = &["Date (YYYY-MM-DD)", "Name"];

/// What a form changes when it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddEvent(NaiveDate),
    DeleteEvent(NaiveDate),
    /// `Some(idx)` replaces the vacation at that list index.
    Vacation(Option<usize>),
    /// `Some(idx)` replaces the holiday at that list index.
    Holiday(Option<usize>),
    Setting(SettingField),
}

/// Labelled text fields edited one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub labels: &'static [&'static str],
    pub fields: Vec<String>,
    pub focus: usize,
}

impl Form {
    fn new(kind: FormKind, labels: &'static [&'static str], mut fields: Vec<String>) -> Self {
        fields.resize(labels.len(), String::new());
        Self {
            kind,
            labels,
            fields,
            focus: 0,
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            FormKind::AddEvent(date) => format!("Add event on {}", date),
            FormKind::DeleteEvent(date) => format!("Delete event on {}", date),
            FormKind::Vacation(None) => "Add vacation".to_string(),
            FormKind::Vacation(Some(_)) => "Edit vacation".to_string(),
            FormKind::Holiday(None) => "Add holiday".to_string(),
            FormKind::Holiday(Some(_)) => "Edit holiday".to_string(),
            FormKind::Setting(field) => format!("Edit {}", field.label()),
        }
    }

    pub fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.push(c);
        }
    }

    pub fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.on_last_field() {
            self.focus += 1;
        }
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn on_last_field(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }

    fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.trim()).unwrap_or_default()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(what: &str, value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("Invalid {}: expected YYYY-MM-DD, got {:?}", what, value))
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub state: AppState,
    pub view: View,
    pub today: NaiveDate,
    pub selected_date: NaiveDate,
    /// Index into `settings.time_periods`.
    pub period_file_idx: usize,
    /// Row selected in the Vacations / Holidays / Settings lists.
    pub list_selection: usize,
    pub status_message: Option<String>,
    pub form: Option<Form>,
    pub search_query: String,
    /// Row selected in the event search results.
    pub search_selection: usize,

    pub data: Dataset,
    pub period_stats: Option<PeriodStats>,
    /// Aggregate over the periods starting in the selected period's year.
    pub year_stats: Option<PeriodStats>,
    /// Per-period stats for the same year, in file order.
    pub year_breakdown: Vec<PeriodStats>,

    store: Store,
    period_key: Option<String>,
    /// Hypothetical badge data while in what-if mode.
    what_if: Option<BadgeEntryData>,
    saved_checksum: u64,
}

impl App {
    pub fn new(store: Store, today: NaiveDate) -> Result<Self> {
        let data = store
            .load_all(0)
            .with_context(|| format!("Failed to load data from {}", store.dir().display()))?;
        let saved_checksum = data.checksum();

        let mut app = Self {
            state: AppState::Normal,
            view: View::Calendar,
            today,
            selected_date: today,
            period_file_idx: 0,
            list_selection: 0,
            status_message: None,
            form: None,
            search_query: String::new(),
            search_selection: 0,
            data,
            period_stats: None,
            year_stats: None,
            year_breakdown: Vec::new(),
            store,
            period_key: None,
            what_if: None,
            saved_checksum,
        };
        app.select_date(today);
        info!(
            periods = app.data.periods.len(),
            badges = app.data.badges.len(),
            "Loaded data"
        );
        Ok(app)
    }

    // ===== Accessors =====

    pub fn current_period(&self) -> Option<&TimePeriod> {
        self.period_key
            .as_deref()
            .and_then(|k| self.data.periods.by_key(k).ok())
    }

    /// Badge data the calendar shows: the hypothetical copy in what-if mode.
    pub fn badges(&self) -> &BadgeEntryData {
        self.what_if.as_ref().unwrap_or(&self.data.badges)
    }

    pub fn in_what_if(&self) -> bool {
        self.what_if.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.data.checksum() != self.saved_checksum
    }

    pub fn period_file(&self) -> &str {
        self.data.periods.filename()
    }

    // ===== Statistics =====

    pub fn recalculate(&mut self) {
        let goal = self.data.settings.goal;
        let today = Some(self.today);

        self.period_stats = self.current_period().map(|p| {
            calculate_period_stats(
                p,
                self.badges(),
                &self.data.holidays,
                &self.data.vacations,
                goal,
                today,
            )
        });

        let year = self
            .current_period()
            .map(|p| p.start_date.year())
            .unwrap_or_else(|| self.selected_date.year());
        let periods = self.data.periods.for_year(year);
        self.year_breakdown = periods
            .iter()
            .map(|p| {
                calculate_period_stats(
                    p,
                    self.badges(),
                    &self.data.holidays,
                    &self.data.vacations,
                    goal,
                    today,
                )
            })
            .collect();
        self.year_stats = calculate_year_stats(
            &periods,
            self.badges(),
            &self.data.holidays,
            &self.data.vacations,
            goal,
            today,
        );
    }

    // ===== Navigation =====

    /// Select `date`, switching to the period containing it (or the nearest
    /// one) when it falls outside the current period.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        let inside = self.current_period().is_some_and(|p| p.contains(date));
        if !inside {
            self.period_key = self.data.periods.nearest(date).ok().map(|p| p.key.clone());
            debug!(date = %date, period = ?self.period_key, "Switched period");
        }
        self.recalculate();
    }

    /// Move the selection by `days` (negative moves back).
    pub fn move_selection(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.select_date(date);
        }
    }

    pub fn jump_to_today(&mut self) {
        self.select_date(self.today);
    }

    pub fn next_period(&mut self) {
        self.step_period(1);
    }

    pub fn prev_period(&mut self) {
        self.step_period(-1);
    }

    fn step_period(&mut self, step: isize) {
        let Some(idx) = self.period_key.as_deref().and_then(|k| self.data.periods.index_of(k))
        else {
            return;
        };
        let Some(target) = idx
            .checked_add_signed(step)
            .and_then(|i| self.data.periods.all().get(i))
            .cloned()
        else {
            self.status_message = Some("No more time periods".to_string());
            return;
        };

        self.period_key = Some(target.key.clone());
        self.selected_date = if target.contains(self.today) {
            self.today
        } else {
            target.start_date
        };
        self.recalculate();
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.list_selection = 0;
        }
    }

    pub fn list_len(&self) -> usize {
        match self.view {
            View::Vacations => self.data.vacations.len(),
            View::Holidays => self.data.holidays.len(),
            View::Settings => SettingField::ALL.len(),
            View::Calendar | View::Year => 0,
        }
    }

    pub fn list_up(&mut self) {
        self.list_selection = self.list_selection.saturating_sub(1);
    }

    pub fn list_down(&mut self) {
        if self.list_selection + 1 < self.list_len() {
            self.list_selection += 1;
        }
    }

    // ===== Editing =====

    fn badges_mut(&mut self) -> &mut BadgeEntryData {
        self.what_if.as_mut().unwrap_or(&mut self.data.badges)
    }

    pub fn toggle_badge(&mut self) {
        let date = self.selected_date;
        if !is_weekday(date) {
            self.status_message = Some("Weekends don't count toward attendance".to_string());
            return;
        }
        let office = self.data.settings.default_office.clone();
        let badged = self.badges_mut().toggle_badge(date, &office);
        debug!(date = %date, badged, what_if = self.in_what_if(), "Toggled badge");
        self.recalculate();
    }

    pub fn toggle_flex(&mut self) {
        let date = self.selected_date;
        if !is_weekday(date) {
            self.status_message = Some("Weekends don't count toward attendance".to_string());
            return;
        }
        let label = self.data.settings.flex_credit.clone();
        let badged = self.badges_mut().toggle_flex(date, &label);
        debug!(date = %date, badged, what_if = self.in_what_if(), "Toggled flex credit");
        self.recalculate();
    }

    /// Enter what-if mode, or leave it and discard the hypothetical edits.
    pub fn toggle_what_if(&mut self) {
        if self.what_if.take().is_some() {
            self.status_message = Some("What-if changes discarded".to_string());
        } else {
            self.what_if = Some(self.data.badges.clone());
            self.status_message =
                Some("What-if mode: badge changes are temporary (w to exit)".to_string());
        }
        self.recalculate();
    }

    /// Remove the selected vacation or holiday.
    pub fn delete_selected(&mut self) {
        match self.view {
            View::Vacations => {
                let Some(v) = self.data.vacations.all().get(self.list_selection).cloned() else {
                    return;
                };
                self.data.vacations.remove(v.start_date, v.end_date);
                self.status_message = Some(format!("Deleted vacation: {}", v.destination));
            }
            View::Holidays => {
                let Some(h) = self.data.holidays.all().get(self.list_selection).cloned() else {
                    return;
                };
                self.data.holidays.remove(h.date);
                self.status_message = Some(format!("Deleted holiday: {}", h.name));
            }
            View::Calendar | View::Year | View::Settings => return,
        }
        self.list_selection = self.list_selection.min(self.list_len().saturating_sub(1));
        self.recalculate();
    }

    // ===== Events =====

    pub fn start_add_event(&mut self) {
        let form = Form::new(
            FormKind::AddEvent(self.selected_date),
            EVENT_LABELS,
            Vec::new(),
        );
        self.open_form(form);
    }

    /// Ask which event on the selected day to delete, starting from the first.
    pub fn start_delete_event(&mut self) {
        let date = self.selected_date;
        let first = self
            .data
            .events
            .event_map()
            .get(&date)
            .and_then(|events| events.first())
            .map(|e| e.description.clone());
        let Some(description) = first else {
            self.status_message = Some(format!("No events on {}", date));
            return;
        };
        self.open_form(Form::new(
            FormKind::DeleteEvent(date),
            EVENT_LABELS,
            vec![description],
        ));
    }

    pub fn start_search(&mut self) {
        self.search_query.clear();
        self.search_selection = 0;
        self.state = AppState::SearchingEvents;
    }

    pub fn search_results(&self) -> Vec<&Event> {
        self.data.events.search(&self.search_query)
    }

    pub fn search_push(&mut self, c: char) {
        self.search_query.push(c);
        self.search_selection = 0;
    }

    pub fn search_pop(&mut self) {
        self.search_query.pop();
        self.search_selection = 0;
    }

    pub fn search_up(&mut self) {
        self.search_selection = self.search_selection.saturating_sub(1);
    }

    pub fn search_down(&mut self) {
        if self.search_selection + 1 < self.search_results().len() {
            self.search_selection += 1;
        }
    }

    /// Leave search, jumping to the highlighted result's date if there is one.
    pub fn finish_search(&mut self) {
        let target = self
            .search_results()
            .get(self.search_selection)
            .map(|e| e.date);
        self.cancel_search();
        if let Some(date) = target {
            self.set_view(View::Calendar);
            self.select_date(date);
        }
    }

    pub fn cancel_search(&mut self) {
        self.state = AppState::Normal;
        self.search_query.clear();
        self.search_selection = 0;
    }

    // ===== Forms =====

    /// Open an empty vacation or holiday form, dated at the selected day.
    pub fn start_add(&mut self) {
        let day = format_date(self.selected_date);
        let form = match self.view {
            View::Vacations => Form::new(
                FormKind::Vacation(None),
                VACATION_LABELS,
                vec![String::new(), day.clone(), day, "y".to_string()],
            ),
            View::Holidays => Form::new(FormKind::Holiday(None), HOLIDAY_LABELS, vec![day]),
            View::Calendar | View::Year | View::Settings => return,
        };
        self.open_form(form);
    }

    /// Open the selected vacation, holiday or setting for editing.
    pub fn start_edit(&mut self) {
        let idx = self.list_selection;
        let form = match self.view {
            View::Vacations => {
                let Some(v) = self.data.vacations.all().get(idx) else {
                    return;
                };
                Form::new(
                    FormKind::Vacation(Some(idx)),
                    VACATION_LABELS,
                    vec![
                        v.destination.clone(),
                        format_date(v.start_date),
                        format_date(v.end_date),
                        if v.approved { "y" } else { "n" }.to_string(),
                    ],
                )
            }
            View::Holidays => {
                let Some(h) = self.data.holidays.all().get(idx) else {
                    return;
                };
                Form::new(
                    FormKind::Holiday(Some(idx)),
                    HOLIDAY_LABELS,
                    vec![format_date(h.date), h.name.clone()],
                )
            }
            View::Settings => {
                let Some(field) = SettingField::ALL.get(idx).copied() else {
                    return;
                };
                Form::new(
                    FormKind::Setting(field),
                    field.form_labels(),
                    vec![field.value(&self.data.settings)],
                )
            }
            View::Calendar | View::Year => return,
        };
        self.open_form(form);
    }

    fn open_form(&mut self, form: Form) {
        self.form = Some(form);
        self.state = AppState::Editing;
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.state = AppState::Normal;
    }

    /// Enter in a form: move to the next field, or apply the form from the
    /// last one. A rejected form stays open with the reason in the status bar.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            self.state = AppState::Normal;
            return;
        };
        if !form.on_last_field() {
            form.next_field();
            return;
        }
        let Some(form) = self.form.take() else {
            return;
        };
        match self.apply_form(&form) {
            Ok(message) => {
                self.state = AppState::Normal;
                self.status_message = Some(message);
                self.recalculate();
            }
            Err(message) => {
                debug!(kind = ?form.kind, reason = %message, "Form rejected");
                self.status_message = Some(message);
                self.form = Some(form);
            }
        }
    }

    fn apply_form(&mut self, form: &Form) -> std::result::Result<String, String> {
        match form.kind {
            FormKind::AddEvent(date) => {
                let description = form.value(0);
                if description.is_empty() {
                    return Ok("No event added".to_string());
                }
                self.data.events.add(Event::new(date, description));
                debug!(date = %date, "Added event");
                Ok(format!("Added event on {}", date))
            }
            FormKind::DeleteEvent(date) => {
                let description = form.value(0);
                if self.data.events.remove(date, description) {
                    debug!(date = %date, "Deleted event");
                    Ok(format!("Deleted event: {}", description))
                } else {
                    Err(format!("Could not find event {:?} on {}", description, date))
                }
            }
            FormKind::Vacation(editing) => {
                let destination = form.value(0);
                let start = parse_date("start date", form.value(1))?;
                let end = parse_date("end date", form.value(2))?;
                if end < start {
                    return Err(format!("Invalid vacation: ends {} before it starts {}", end, start));
                }
                let approved = matches!(form.value(3).to_lowercase().as_str(), "y" | "yes");

                if let Some(old) = editing.and_then(|i| self.data.vacations.all().get(i).cloned()) {
                    self.data.vacations.remove(old.start_date, old.end_date);
                }
                let mut vacation = Vacation::new(destination, start, end);
                vacation.approved = approved;
                self.data.vacations.add(vacation);
                self.list_selection = self.data.vacations.len().saturating_sub(1);
                Ok(match editing {
                    Some(_) => format!("Updated vacation: {}", destination),
                    None => format!("Added vacation: {}", destination),
                })
            }
            FormKind::Holiday(editing) => {
                let date = parse_date("holiday date", form.value(0))?;
                let name = form.value(1);
                if name.is_empty() {
                    return Err("Invalid holiday: a name is required".to_string());
                }

                if let Some(old) = editing.and_then(|i| self.data.holidays.all().get(i).map(|h| h.date)) {
                    self.data.holidays.remove(old);
                }
                self.data.holidays.add(Holiday::new(name, date));
                if let Some(pos) = self.data.holidays.all().iter().position(|h| h.date == date) {
                    self.list_selection = pos;
                }
                Ok(match editing {
                    Some(_) => format!("Updated holiday: {}", name),
                    None => format!("Added holiday: {}", name),
                })
            }
            FormKind::Setting(field) => {
                let value = form.value(0);
                match field {
                    SettingField::DefaultOffice | SettingField::FlexCredit if value.is_empty() => {
                        return Err(format!("Invalid {}: cannot be empty", field.label()));
                    }
                    SettingField::DefaultOffice => {
                        self.data.settings.default_office = value.to_string()
                    }
                    SettingField::FlexCredit => self.data.settings.flex_credit = value.to_string(),
                    SettingField::Goal => match value.parse::<i32>() {
                        Ok(goal) if (1..=100).contains(&goal) => self.data.settings.goal = goal,
                        _ => {
                            return Err(format!(
                                "Invalid goal {:?}: enter a whole number from 1 to 100",
                                value
                            ))
                        }
                    },
                }
                Ok(format!("{} set to {}", field.label(), value))
            }
        }
    }

    /// Switch to the next configured time-period file.
    pub fn cycle_period_file(&mut self) {
        let files = self.data.settings.time_periods.len();
        if files < 2 {
            self.status_message = Some("Only one time period file configured".to_string());
            return;
        }
        let next = (self.period_file_idx + 1) % files;
        let filename = self.data.settings.active_time_period_file(next).to_string();
        match self.store.load_periods(&filename) {
            Ok(periods) => {
                self.period_file_idx = next;
                self.data.periods = periods;
                self.period_key = None;
                self.status_message = Some(format!("Time periods: {}", filename));
                self.select_date(self.selected_date);
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "Failed to load time periods");
                self.status_message = Some(format!("Could not load {}: {}", filename, e));
            }
        }
    }

    // ===== Persistence =====

    pub fn save(&mut self) {
        if self.in_what_if() {
            self.status_message = Some("Leave what-if mode (w) before saving".to_string());
            return;
        }
        match self.store.save_all(&self.data) {
            Ok(()) => {
                self.saved_checksum = self.data.checksum();
                self.status_message = Some("Saved".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.status_message = Some(format!("Save failed: {}", e));
            }
        }
    }

    /// Save pending changes, then commit the data directory to git.
    pub fn backup(&mut self) {
        if self.is_dirty() {
            self.save();
            if self.is_dirty() {
                return;
            }
        }
        let outcome = backup::perform(self.store.dir(), None);
        self.status_message = Some(outcome.message);
    }

    /// Quit now, or ask first when there are unsaved changes.
    pub fn request_quit(&mut self) {
        self.state = if self.is_dirty() {
            AppState::ConfirmingQuit
        } else {
            AppState::Quitting
        };
    }
}
