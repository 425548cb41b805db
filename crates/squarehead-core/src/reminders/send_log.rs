use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dispatch::SendKey;

/// Reminders already delivered, keyed by (member, dance night, offset).
///
/// The daily job may run more than once for the same day; anything in here
/// is not sent again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendLog {
    #[serde(default)]
    entries: BTreeSet<SendKey>,
}

impl SendLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &SendKey) -> bool {
        self.entries.contains(key)
    }

    /// Returns false when the key was already logged.
    pub fn record(&mut self, key: SendKey) -> bool {
        self.entries.insert(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries for nights before `date`; returns how many were removed.
    pub fn prune_before(&mut self, date: NaiveDate) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k| k.dance_date >= date);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;

    fn key(member_id: i64, d: &str, offset: i64) -> SendKey {
        SendKey {
            member_id,
            dance_date: parse_date(d).unwrap(),
            offset_days: offset,
        }
    }

    #[test]
    fn test_record_and_contains() {
        let mut log = SendLog::new();
        assert!(log.record(key(1, "2025-06-13", 7)));
        assert!(!log.record(key(1, "2025-06-13", 7)));
        assert!(log.contains(&key(1, "2025-06-13", 7)));
        // a later offset for the same night is a different reminder
        assert!(!log.contains(&key(1, "2025-06-13", 3)));
    }

    #[test]
    fn test_prune_before() {
        let mut log = SendLog::new();
        log.record(key(1, "2025-06-04", 1));
        log.record(key(2, "2025-06-11", 7));
        assert_eq!(log.prune_before(parse_date("2025-06-05").unwrap()), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_round_trips_as_json() {
        let mut log = SendLog::new();
        log.record(key(3, "2025-06-13", 14));
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"offsetDays\":14"));
        let back: SendLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
