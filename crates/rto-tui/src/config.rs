//! Application configuration.
//!
//! Resolves where attendance data lives and where logs go. The data
//! directory comes from `--data-dir`, then `RTO_DATA_DIR`, then `./config`.
//! Logs from the interactive calendar go to `<cache dir>/rto/logs`.

use std::path::PathBuf;

use anyhow::Result;

/// Application name used for cache directory paths
const APP_NAME: &str = "rto";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "RTO_DATA_DIR";

/// Data directory used when nothing else is configured
const DEFAULT_DATA_DIR: &str = "./config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load(data_dir_flag: Option<PathBuf>) -> Self {
        Self::resolve(data_dir_flag, std::env::var(DATA_DIR_ENV).ok())
    }

    fn resolve(flag: Option<PathBuf>, env: Option<String>) -> Self {
        let data_dir = flag
            .or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self { data_dir }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }
}
