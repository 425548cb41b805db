//! Core library for squarehead: square-dance club duty scheduling.
//!
//! - `directory`: member records and the rules every write must keep
//! - `schedule`: rotating squarehead assignments for dance nights
//! - `reminders`: which squareheads get a reminder today, and to whom it goes
//! - `repository`: storage and mail interfaces the core runs against
//! - `store`: JSON file implementation of the repositories
//!
//! The scheduling and selection functions are pure; nothing in here sends
//! mail or talks to a network.

pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod reminders;
pub mod repository;
pub mod schedule;
pub mod store;
pub mod utils;

pub use config::Config;
pub use directory::MemberDirectory;
pub use error::{AssignmentError, DirectoryError, SendError, SquareheadError};
pub use models::{
    Assignment, AssignmentStatus, DanceDate, Member, MemberId, MemberStatus, NightType, Schedule,
    ScheduleId, Settings,
};
pub use reminders::{build_dispatches, select_due, Dispatch, DispatchPlan, ReminderHit, ReminderJob, SendLog};
pub use repository::{AssignmentRepository, EmailSender, MemberRepository, SettingsProvider};
pub use schedule::{generate, generate_with, GenerateOptions, ScheduleSummary};
pub use store::ClubStore;
