use serde::{Deserialize, Serialize};

use super::period::DEFAULT_TIME_PERIOD_FILE;

const DEFAULT_OFFICE: &str = "McLean, VA";
const DEFAULT_FLEX_CREDIT: &str = "Flex Credit";
const DEFAULT_GOAL: i32 = 50;

/// Application settings from `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub default_office: String,
    /// Office label written on flex-credit entries.
    #[serde(default)]
    pub flex_credit: String,
    /// Required office percentage, 1-100.
    #[serde(default)]
    pub goal: i32,
    /// Period configuration files; the first is active on startup.
    #[serde(default)]
    pub time_periods: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_office: DEFAULT_OFFICE.to_string(),
            flex_credit: DEFAULT_FLEX_CREDIT.to_string(),
            goal: DEFAULT_GOAL,
            time_periods: vec![DEFAULT_TIME_PERIOD_FILE.to_string()],
        }
    }
}

impl AppSettings {
    /// Fill empty or non-positive fields from the defaults.
    pub fn with_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            default_office: if self.default_office.is_empty() {
                defaults.default_office
            } else {
                self.default_office
            },
            flex_credit: if self.flex_credit.is_empty() {
                defaults.flex_credit
            } else {
                self.flex_credit
            },
            goal: if self.goal > 0 { self.goal } else { defaults.goal },
            time_periods: if self.time_periods.is_empty() {
                defaults.time_periods
            } else {
                self.time_periods
            },
        }
    }

    /// Period file at `idx`, falling back to the first configured file.
    pub fn active_time_period_file(&self, idx: usize) -> &str {
        self.time_periods
            .get(idx)
            .or_else(|| self.time_periods.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_TIME_PERIOD_FILE)
    }
}
