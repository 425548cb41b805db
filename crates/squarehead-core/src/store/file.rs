use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::directory::MemberDirectory;
use crate::models::{Assignment, Member, MemberId, Schedule, ScheduleId, Settings};
use crate::reminders::SendLog;
use crate::repository::{AssignmentRepository, MemberRepository, SettingsProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> Stored<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// JSON-file storage for club records, one file per record kind.
pub struct ClubStore {
    dir: PathBuf,
}

impl ClubStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Stored<T>>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read data file: {}", name))?;
        let stored: Stored<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse data file: {}", name))?;
        Ok(Some(stored))
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        Ok(self.load(name)?.map(|s| s.data).unwrap_or_default())
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let stored = Stored::new(data);
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(self.path(name), contents)
            .with_context(|| format!("Failed to write data file: {}", name))?;
        debug!(file = name, "Saved data file");
        Ok(())
    }

    // ===== Members =====

    pub fn load_members(&self) -> Result<Vec<Member>> {
        self.load_or_default("members")
    }

    pub fn load_directory(&self) -> Result<MemberDirectory> {
        MemberDirectory::from_members(self.load_members()?)
            .context("Stored member records are inconsistent")
    }

    pub fn save_directory(&self, directory: &MemberDirectory) -> Result<()> {
        self.save("members", &directory.members())
    }

    // ===== Schedules =====

    pub fn load_schedules(&self) -> Result<Vec<Schedule>> {
        self.load_or_default("schedules")
    }

    pub fn get_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>> {
        Ok(self.load_schedules()?.into_iter().find(|s| s.id == id))
    }

    pub fn create_schedule(&self, name: &str, start: NaiveDate, end: NaiveDate) -> Result<Schedule> {
        if end < start {
            anyhow::bail!("Schedule end {} is before its start {}", end, start);
        }
        let mut schedules = self.load_schedules()?;
        let id = schedules.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let schedule = Schedule {
            id,
            name: name.to_string(),
            start_date: start,
            end_date: end,
        };
        schedules.push(schedule.clone());
        self.save("schedules", &schedules)?;
        Ok(schedule)
    }

    // ===== Assignments =====

    fn assignments_name(schedule_id: ScheduleId) -> String {
        format!("assignments_{}", schedule_id)
    }

    pub fn load_assignments(&self, schedule_id: ScheduleId) -> Result<Vec<Assignment>> {
        self.load_or_default(&Self::assignments_name(schedule_id))
    }

    fn next_assignment_id(&self) -> Result<i64> {
        let mut max = 0;
        for schedule in self.load_schedules()? {
            for assignment in self.load_assignments(schedule.id)? {
                max = max.max(assignment.id.unwrap_or(0));
            }
        }
        Ok(max + 1)
    }

    pub fn store_assignments(&self, schedule_id: ScheduleId, assignments: &[Assignment]) -> Result<Vec<Assignment>> {
        if self.get_schedule(schedule_id)?.is_none() {
            anyhow::bail!("Schedule not found: {}", schedule_id);
        }
        let mut next_id = self.next_assignment_id()?;
        let mut stored: Vec<Assignment> = assignments.to_vec();
        for assignment in stored.iter_mut().filter(|a| a.id.is_none()) {
            assignment.id = Some(next_id);
            next_id += 1;
        }
        stored.sort_by_key(|a| a.date());
        self.save(&Self::assignments_name(schedule_id), &stored)?;
        Ok(stored)
    }

    // ===== Settings =====

    pub fn load_settings(&self) -> Result<Settings> {
        self.load_or_default("settings")
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save("settings", settings)
    }

    // ===== Send log =====

    pub fn load_send_log(&self) -> Result<SendLog> {
        self.load_or_default("send_log")
    }

    pub fn save_send_log(&self, log: &SendLog) -> Result<()> {
        self.save("send_log", log)
    }

    /// Age of the member roster file, for status output.
    pub fn members_age(&self) -> Option<String> {
        match self.load::<Vec<Member>>("members") {
            Ok(Some(stored)) => Some(stored.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Failed to load members for age display");
                None
            }
        }
    }
}

impl MemberRepository for ClubStore {
    fn list_members(&self) -> Result<Vec<Member>> {
        self.load_members()
    }

    fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.load_members()?.into_iter().find(|m| m.id == id))
    }
}

impl AssignmentRepository for ClubStore {
    fn list_schedules(&self) -> Result<Vec<Schedule>> {
        self.load_schedules()
    }

    fn list_assignments(&self, schedule_id: ScheduleId) -> Result<Vec<Assignment>> {
        self.load_assignments(schedule_id)
    }

    fn save_assignments(&self, schedule_id: ScheduleId, assignments: &[Assignment]) -> Result<()> {
        self.store_assignments(schedule_id, assignments).map(|_| ())
    }
}

impl SettingsProvider for ClubStore {
    fn reminder_offsets(&self) -> Result<Vec<i64>> {
        Ok(self.load_settings()?.reminder_offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::models::DanceDate;
    use chrono::Duration;

    fn store() -> (tempfile::TempDir, ClubStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ClubStore::new(tmp.path().join("data")).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_stored_age_display() {
        let fresh = Stored::new(1);
        assert_eq!(fresh.age_display(), "just now");

        let mut old = Stored::new(1);
        old.saved_at = Utc::now() - Duration::minutes(125);
        assert_eq!(old.age_display(), "2h ago");
    }

    #[test]
    fn test_empty_store_has_defaults() {
        let (_tmp, store) = store();
        assert!(store.load_members().unwrap().is_empty());
        assert!(store.load_schedules().unwrap().is_empty());
        assert_eq!(store.reminder_offsets().unwrap(), vec![14, 7, 3, 1]);
        assert!(store.load_send_log().unwrap().is_empty());
        assert_eq!(store.members_age(), None);
    }

    #[test]
    fn test_directory_round_trip() {
        let (_tmp, store) = store();
        let mut dir = MemberDirectory::new();
        dir.insert(Member::new(1, "Ann", "A", "ann@club.org")).unwrap();
        dir.insert(Member::new(2, "Bo", "B", "bo@club.org").with_partner(1)).unwrap();
        store.save_directory(&dir).unwrap();

        let loaded = store.load_directory().unwrap();
        assert_eq!(loaded.get(1).unwrap().partner_id, Some(2));
        assert_eq!(store.get_member(2).unwrap().map(|m| m.first_name), Some("Bo".to_string()));
        assert!(store.members_age().is_some());
    }

    #[test]
    fn test_assignments_get_ids_across_schedules() {
        let (_tmp, store) = store();
        let d = |s: &str| parse_date(s).unwrap();
        let spring = store.create_schedule("Spring", d("2025-03-01"), d("2025-05-31")).unwrap();
        let summer = store.create_schedule("Summer", d("2025-06-01"), d("2025-08-31")).unwrap();
        assert_eq!((spring.id, summer.id), (1, 2));

        let first = store
            .store_assignments(spring.id, &[Assignment::empty(DanceDate::normal(d("2025-03-05")))])
            .unwrap();
        assert_eq!(first[0].id, Some(1));

        let second = store
            .store_assignments(
                summer.id,
                &[
                    Assignment::empty(DanceDate::normal(d("2025-06-11"))),
                    Assignment::empty(DanceDate::normal(d("2025-06-04"))),
                ],
            )
            .unwrap();
        // sorted by date, ids continue after the other schedule's
        assert_eq!(second[0].date(), d("2025-06-04"));
        assert_eq!(second.iter().filter_map(|a| a.id).collect::<Vec<_>>(), vec![3, 2]);

        let all = store.all_assignments().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date(), d("2025-03-05"));
    }

    #[test]
    fn test_rejects_unknown_schedule_and_bad_range() {
        let (_tmp, store) = store();
        let d = |s: &str| parse_date(s).unwrap();
        assert!(store.save_assignments(7, &[]).is_err());
        assert!(store.create_schedule("Backwards", d("2025-06-01"), d("2025-05-01")).is_err());
    }
}
