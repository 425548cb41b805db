//! Application configuration management.
//!
//! The configuration holds where club data lives, who reminder mail comes
//! from, the club's dance weekday and when the daemon sends reminders.
//!
//! Configuration is stored at `~/.config/squarehead/config.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::parse_weekday;
use crate::schedule::DEFAULT_LOOKBACK_DAYS;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "squarehead";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Longest history window `lookback_days` may ask for (about 100 years)
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "SQUAREHEAD_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub outbox_dir: Option<PathBuf>,
    #[serde(default = "default_club_name")]
    pub club_name: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_dance_weekday")]
    pub dance_weekday: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Local hour (0-23) at which the daemon runs the daily reminder job.
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: u32,
}

fn default_club_name() -> String {
    "Square Dance Club".to_string()
}

fn default_from_address() -> String {
    "squareheads@localhost".to_string()
}

fn default_dance_weekday() -> String {
    "Wed".to_string()
}

fn default_lookback_days() -> i64 {
    DEFAULT_LOOKBACK_DAYS
}

fn default_reminder_hour() -> u32 {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            outbox_dir: None,
            club_name: default_club_name(),
            from_address: default_from_address(),
            dance_weekday: default_dance_weekday(),
            lookback_days: default_lookback_days(),
            reminder_hour: default_reminder_hour(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Environment override, then the configured path, then the platform data dir.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn outbox_dir(&self) -> Result<PathBuf> {
        match self.outbox_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("outbox")),
        }
    }

    pub fn weekday(&self) -> Result<Weekday> {
        parse_weekday(&self.dance_weekday).map_err(|e| anyhow::anyhow!(e))
    }

    pub fn validate(&self) -> Result<()> {
        self.weekday()?;
        if self.reminder_hour > 23 {
            anyhow::bail!("reminder_hour must be between 0 and 23, got {}", self.reminder_hour);
        }
        if !(0..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            anyhow::bail!(
                "lookback_days must be between 0 and {}, got {}",
                MAX_LOOKBACK_DAYS,
                self.lookback_days
            );
        }
        Ok(())
    }
}
