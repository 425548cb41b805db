use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::days_until;
use crate::error::{Result, SquareheadError};
use crate::models::{Assignment, MemberId, NightType};

/// One squarehead due a reminder for one dance night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ReminderHit {
    #[serde(rename = "memberId")]
    pub member_id: MemberId,
    #[serde(rename = "danceDate")]
    pub dance_date: NaiveDate,
    #[serde(rename = "daysUntil")]
    pub days_until: i64,
    #[serde(rename = "nightType")]
    pub night_type: NightType,
    /// The other squarehead that night.
    #[serde(rename = "partnerMemberId", default)]
    pub partner_member_id: Option<MemberId>,
}

/// Rejects negative offsets and collapses repeats.
pub fn validate_offsets(offsets_days: &[i64]) -> Result<BTreeSet<i64>> {
    if let Some(bad) = offsets_days.iter().find(|o| **o < 0) {
        return Err(SquareheadError::InvalidOffset(*bad));
    }
    Ok(offsets_days.iter().copied().collect())
}

/// Reminders due on `reference`: every squarehead whose night is exactly one
/// of `offsets_days` away. Same-day reminders use offset 0.
///
/// Output is ordered by dance date, then slot 1 before slot 2.
pub fn select_due(
    reference: NaiveDate,
    assignments: &[Assignment],
    offsets_days: &[i64],
) -> Result<Vec<ReminderHit>> {
    if assignments.is_empty() {
        return Ok(Vec::new());
    }
    let offsets = validate_offsets(offsets_days)?;

    let mut due: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| a.dance_date.needs_squareheads())
        .filter(|a| offsets.contains(&days_until(reference, a.date())))
        .collect();
    due.sort_by_key(|a| a.date());

    let mut hits = Vec::new();
    for assignment in due {
        let days = days_until(reference, assignment.date());
        for member_id in assignment.squareheads() {
            hits.push(ReminderHit {
                member_id,
                dance_date: assignment.date(),
                days_until: days,
                night_type: assignment.night_type(),
                partner_member_id: assignment.partner_of(member_id),
            });
        }
    }
    Ok(hits)
}
