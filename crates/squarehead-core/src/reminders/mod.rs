//! Reminder selection and dispatch.
//!
//! - `select_due`: which squareheads get a reminder on a given day
//! - `build_dispatches`: resolve hits to recipients, one per member per night
//! - `SendLog`: reminders already delivered, so reruns do not repeat them
//! - `ReminderJob`: the daily run tying the above to storage and a sender

pub mod dispatch;
pub mod job;
pub mod selector;
pub mod send_log;

pub use dispatch::{build_dispatches, Dispatch, DispatchPlan, SendKey, SkipReason, SkippedHit};
pub use job::{FailedSend, ReminderJob, ReminderPreview, ReminderRunReport};
pub use selector::{select_due, validate_offsets, ReminderHit};
pub use send_log::SendLog;
