//! File-backed storage for a data directory.
//!
//! Each collection lives in its own file. A missing file loads as an empty
//! collection; a malformed one is an error naming the file.

mod defaults;

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::models::{
    AppSettings, BadgeEntryData, EventData, HolidayData, TimePeriodData, VacationData,
};

pub const SETTINGS_FILE: &str = "settings.yaml";
pub const BADGE_FILE: &str = "badge_data.json";
pub const HOLIDAYS_FILE: &str = "holidays.yaml";
pub const VACATIONS_FILE: &str = "vacations.yaml";
pub const EVENTS_FILE: &str = "events.json";

/// Everything loaded from a data directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub settings: AppSettings,
    pub periods: TimePeriodData,
    pub badges: BadgeEntryData,
    pub holidays: HolidayData,
    pub vacations: VacationData,
    pub events: EventData,
}

impl Dataset {
    /// Hash of the user-editable collections, for unsaved-change detection.
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for part in [
            serde_json::to_string(&self.badges),
            serde_json::to_string(&self.holidays),
            serde_json::to_string(&self.vacations),
            serde_json::to_string(&self.events),
            serde_json::to_string(&self.settings),
        ] {
            part.unwrap_or_default().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.path(name);
        if !path.exists() {
            debug!(file = name, "Data file missing, using empty collection");
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| DataError::io(path, e))
    }

    fn write(&self, name: &str, contents: String) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| DataError::io(&self.dir, e))?;
        let path = self.path(name);
        fs::write(&path, contents).map_err(|e| DataError::io(path, e))?;
        debug!(file = name, "Saved data file");
        Ok(())
    }

    fn load_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        match self.read(name)? {
            Some(contents) => serde_json::from_str(&contents).map_err(|source| DataError::Json {
                file: name.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    fn save_json<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let contents = serde_json::to_string_pretty(data).map_err(|source| DataError::Json {
            file: name.to_string(),
            source,
        })?;
        self.write(name, contents)
    }

    fn load_yaml<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        match self.read(name)? {
            Some(contents) if contents.trim().is_empty() => Ok(T::default()),
            Some(contents) => serde_yaml::from_str(&contents).map_err(|source| DataError::Yaml {
                file: name.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    fn save_yaml<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let contents = serde_yaml::to_string(data).map_err(|source| DataError::Yaml {
            file: name.to_string(),
            source,
        })?;
        self.write(name, contents)
    }

    // ===== Settings =====

    pub fn load_settings(&self) -> Result<AppSettings> {
        if !self.path(SETTINGS_FILE).exists() {
            return Ok(AppSettings::default());
        }
        let settings: AppSettings = self.load_yaml(SETTINGS_FILE)?;
        Ok(settings.with_defaults())
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.save_yaml(SETTINGS_FILE, settings)
    }

    // ===== Time periods =====

    pub fn load_periods(&self, filename: &str) -> Result<TimePeriodData> {
        let mut data: TimePeriodData = self.load_yaml(filename)?;
        data.set_filename(filename);
        data.validate()?;
        debug!(file = filename, count = data.len(), "Loaded time periods");
        Ok(data)
    }

    pub fn save_periods(&self, periods: &TimePeriodData) -> Result<()> {
        self.save_yaml(periods.filename(), periods)
    }

    // ===== Badges =====

    pub fn load_badges(&self) -> Result<BadgeEntryData> {
        self.load_json(BADGE_FILE)
    }

    pub fn save_badges(&self, badges: &BadgeEntryData) -> Result<()> {
        self.save_json(BADGE_FILE, badges)
    }

    // ===== Holidays =====

    pub fn load_holidays(&self) -> Result<HolidayData> {
        let mut data: HolidayData = self.load_yaml(HOLIDAYS_FILE)?;
        data.sort();
        Ok(data)
    }

    pub fn save_holidays(&self, holidays: &HolidayData) -> Result<()> {
        self.save_yaml(HOLIDAYS_FILE, holidays)
    }

    // ===== Vacations =====

    pub fn load_vacations(&self) -> Result<VacationData> {
        self.load_yaml(VACATIONS_FILE)
    }

    pub fn save_vacations(&self, vacations: &VacationData) -> Result<()> {
        self.save_yaml(VACATIONS_FILE, vacations)
    }

    // ===== Events =====

    pub fn load_events(&self) -> Result<EventData> {
        self.load_json(EVENTS_FILE)
    }

    pub fn save_events(&self, events: &EventData) -> Result<()> {
        self.save_json(EVENTS_FILE, events)
    }

    // ===== Initialization =====

    pub fn needs_init(&self) -> bool {
        !self.dir.is_dir() || !self.path(SETTINGS_FILE).exists()
    }

    /// Write default data for every missing file. Existing files are left
    /// untouched. Returns the names of the files created.
    pub fn init(&self) -> Result<Vec<String>> {
        self.init_at(Local::now().naive_local())
    }

    pub fn init_at(&self, now: NaiveDateTime) -> Result<Vec<String>> {
        fs::create_dir_all(&self.dir).map_err(|e| DataError::io(&self.dir, e))?;
        let mut created = Vec::new();

        let settings = if self.path(SETTINGS_FILE).exists() {
            self.load_settings()?
        } else {
            let settings = AppSettings::default();
            self.save_settings(&settings)?;
            created.push(SETTINGS_FILE.to_string());
            settings
        };

        for file in &settings.time_periods {
            if !self.path(file).exists() {
                let mut periods = defaults::time_periods();
                periods.set_filename(file.as_str());
                self.save_periods(&periods)?;
                created.push(file.clone());
            }
        }

        if !self.path(BADGE_FILE).exists() {
            self.save_badges(&defaults::badges(&settings, now))?;
            created.push(BADGE_FILE.to_string());
        }
        if !self.path(HOLIDAYS_FILE).exists() {
            self.save_holidays(&defaults::holidays())?;
            created.push(HOLIDAYS_FILE.to_string());
        }
        if !self.path(VACATIONS_FILE).exists() {
            self.save_vacations(&defaults::vacations())?;
            created.push(VACATIONS_FILE.to_string());
        }
        if !self.path(EVENTS_FILE).exists() {
            self.save_events(&defaults::events(now.date()))?;
            created.push(EVENTS_FILE.to_string());
        }

        info!(dir = %self.dir.display(), files = created.len(), "Initialized data directory");
        Ok(created)
    }

    // ===== Bulk =====

    /// Load everything, using the period file at `period_file_idx`.
    pub fn load_all(&self, period_file_idx: usize) -> Result<Dataset> {
        let settings = self.load_settings()?;
        let periods = self.load_periods(settings.active_time_period_file(period_file_idx))?;
        Ok(Dataset {
            periods,
            badges: self.load_badges()?,
            holidays: self.load_holidays()?,
            vacations: self.load_vacations()?,
            events: self.load_events()?,
            settings,
        })
    }

    /// Save the user-editable collections and settings. Period files are
    /// only written by `init`.
    pub fn save_all(&self, data: &Dataset) -> Result<()> {
        self.save_settings(&data.settings)?;
        self.save_badges(&data.badges)?;
        self.save_holidays(&data.holidays)?;
        self.save_vacations(&data.vacations)?;
        self.save_events(&data.events)?;
        info!(dir = %self.dir.display(), "Saved all data");
        Ok(())
    }
}
