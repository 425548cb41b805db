//! Squarehead schedule generation.
//!
//! `generate` turns a list of dance nights and the member roster into
//! proposed assignments. It is pure: callers persist the result.

pub mod engine;
pub mod summary;

pub use engine::{generate, generate_with, GenerateOptions, DEFAULT_LOOKBACK_DAYS};
pub use summary::ScheduleSummary;
