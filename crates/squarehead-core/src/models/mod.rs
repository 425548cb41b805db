//! Data models for club records.
//!
//! - `Member`, `MemberStatus`: club members and their duty status
//! - `DanceDate`, `NightType`: club nights on the calendar
//! - `Assignment`, `AssignmentStatus`: squarehead duty per night
//! - `Schedule`, `Settings`: schedule ranges and admin settings

pub mod assignment;
pub mod dance;
pub mod member;
pub mod schedule;

pub use assignment::{Assignment, AssignmentId, AssignmentStatus};
pub use dance::{DanceDate, NightType};
pub use member::{normalize_email, Member, MemberId, MemberStatus};
pub use schedule::{Schedule, ScheduleId, Settings, DEFAULT_REMINDER_OFFSETS};
