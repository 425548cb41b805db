//! Local JSON storage for club data.
//!
//! `ClubStore` keeps members, schedules, per-schedule assignments, admin
//! settings and the reminder send log as JSON files in the data directory,
//! each stamped with the time it was saved.

pub mod file;

pub use file::{ClubStore, Stored};
