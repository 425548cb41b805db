use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ScheduleId = i64;

/// A named date range whose assignments are generated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
}

impl Schedule {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn date_range_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%b %d, %Y"),
            self.end_date.format("%b %d, %Y")
        )
    }
}

/// Administrative settings editable by club admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Settings {
    #[serde(rename = "clubName", default)]
    pub club_name: String,
    #[serde(rename = "reminderOffsets", default = "default_reminder_offsets")]
    pub reminder_offsets: Vec<i64>,
}

pub const DEFAULT_REMINDER_OFFSETS: [i64; 4] = [14, 7, 3, 1];

fn default_reminder_offsets() -> Vec<i64> {
    DEFAULT_REMINDER_OFFSETS.to_vec()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            club_name: String::new(),
            reminder_offsets: default_reminder_offsets(),
        }
    }
}
