//! Interfaces to the collaborators around the scheduling core.
//!
//! Storage and mail delivery live behind these traits so the engine and the
//! reminder pipeline can run against the file store, an in-memory fixture, or
//! a database-backed implementation alike.

use anyhow::Result;

use crate::error::SendError;
use crate::models::{Assignment, Member, MemberId, Schedule, ScheduleId};
use crate::reminders::Dispatch;

pub trait MemberRepository {
    fn list_members(&self) -> Result<Vec<Member>>;

    fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.list_members()?.into_iter().find(|m| m.id == id))
    }
}

pub trait AssignmentRepository {
    fn list_schedules(&self) -> Result<Vec<Schedule>>;

    fn list_assignments(&self, schedule_id: ScheduleId) -> Result<Vec<Assignment>>;

    /// Replaces the stored assignments of a schedule. Assignments without an
    /// id are given one.
    fn save_assignments(&self, schedule_id: ScheduleId, assignments: &[Assignment]) -> Result<()>;

    /// Assignments of every schedule, in date order.
    fn all_assignments(&self) -> Result<Vec<Assignment>> {
        let mut all = Vec::new();
        for schedule in self.list_schedules()? {
            all.extend(self.list_assignments(schedule.id)?);
        }
        all.sort_by_key(|a| a.date());
        Ok(all)
    }
}

pub trait SettingsProvider {
    fn reminder_offsets(&self) -> Result<Vec<i64>>;
}

pub trait EmailSender {
    fn send(&self, dispatch: &Dispatch) -> std::result::Result<(), SendError>;
}
