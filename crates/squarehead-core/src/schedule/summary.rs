use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Assignment, AssignmentStatus, MemberId};

/// Counts over a generated or stored schedule, for the admin report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub complete: usize,
    pub partial: usize,
    pub unassigned: usize,
    #[serde(rename = "boardNights")]
    pub board_nights: usize,
    /// Duty nights per member across the schedule.
    #[serde(rename = "dutyCounts")]
    pub duty_counts: BTreeMap<MemberId, usize>,
}

impl ScheduleSummary {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut summary = Self::default();
        for assignment in assignments {
            if !assignment.dance_date.needs_squareheads() {
                summary.board_nights += 1;
                continue;
            }
            match assignment.status() {
                AssignmentStatus::Complete => summary.complete += 1,
                AssignmentStatus::Partial => summary.partial += 1,
                AssignmentStatus::Unassigned => summary.unassigned += 1,
            }
            for id in assignment.squareheads() {
                *summary.duty_counts.entry(id).or_default() += 1;
            }
        }
        summary
    }

    pub fn needs_attention(&self) -> bool {
        self.partial > 0 || self.unassigned > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::models::DanceDate;

    #[test]
    fn test_summary_counts() {
        let d = |s: &str| parse_date(s).unwrap();
        let mut full = Assignment::empty(DanceDate::normal(d("2025-07-09")));
        full.squarehead1_id = Some(1);
        full.squarehead2_id = Some(2);
        let mut half = Assignment::empty(DanceDate::normal(d("2025-07-16")));
        half.squarehead2_id = Some(1);
        let empty = Assignment::empty(DanceDate::normal(d("2025-07-23")));
        let board = Assignment::empty(DanceDate::fifth_wednesday(d("2025-07-30")));

        let summary = ScheduleSummary::from_assignments(&[full, half, empty, board]);
        assert_eq!(summary.complete, 1);
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(summary.board_nights, 1);
        assert_eq!(summary.duty_counts.get(&1), Some(&2));
        assert_eq!(summary.duty_counts.get(&2), Some(&1));
        assert!(summary.needs_attention());
    }
}
