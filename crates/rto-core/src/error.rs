use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Time period {0:?} not found")]
    PeriodNotFound(String),

    #[error("No time period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    #[error("No time periods configured")]
    NoPeriods,

    #[error("Time period {key} ends ({end}) before it starts ({start})")]
    InvalidRange {
        key: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
