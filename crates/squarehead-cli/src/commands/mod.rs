pub mod members;
pub mod reminders;
pub mod schedule;
pub mod settings;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use squarehead_core::calendar::parse_date;
use squarehead_core::{ClubStore, Config};
use tracing::debug;

/// Loaded configuration and the store it points at.
pub struct Context {
    pub config: Config,
    pub store: ClubStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        config.validate()?;
        let data_dir = config.data_dir()?;
        debug!(?data_dir, "Data directory configured");
        let store = ClubStore::new(data_dir)?;
        Ok(Self { config, store })
    }

    /// Club name from admin settings, falling back to the config file.
    pub fn club_name(&self) -> Result<String> {
        let settings = self.store.load_settings()?;
        if settings.club_name.trim().is_empty() {
            Ok(self.config.club_name.clone())
        } else {
            Ok(settings.club_name)
        }
    }
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    parse_date(value).map_err(|e| anyhow::anyhow!(e))
}

/// The given date, or today in local time.
pub fn date_or_today(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => parse_date_arg(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
