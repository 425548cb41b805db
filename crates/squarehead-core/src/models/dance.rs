use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub enum NightType {
    #[default]
    Normal,
    /// Board-run night; no squareheads are assigned.
    FifthWednesday,
}

impl std::fmt::Display for NightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NightType::Normal => write!(f, "Normal"),
            NightType::FifthWednesday => write!(f, "Fifth Wednesday"),
        }
    }
}

/// A club night on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DanceDate {
    pub date: NaiveDate,
    #[serde(rename = "nightType", default)]
    pub night_type: NightType,
}

impl DanceDate {
    pub fn normal(date: NaiveDate) -> Self {
        Self {
            date,
            night_type: NightType::Normal,
        }
    }

    pub fn fifth_wednesday(date: NaiveDate) -> Self {
        Self {
            date,
            night_type: NightType::FifthWednesday,
        }
    }

    pub fn needs_squareheads(&self) -> bool {
        self.night_type == NightType::Normal
    }

    /// "Wed, Jun 04, 2025"
    pub fn formatted(&self) -> String {
        self.date.format("%a, %b %d, %Y").to_string()
    }
}
