use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dance::{DanceDate, NightType};
use crate::error::AssignmentError;
use super::member::MemberId;

pub type AssignmentId = i64;

/// Fill state of an assignment. Derived from the slots, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Complete,
    Partial,
    Unassigned,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Complete => write!(f, "complete"),
            AssignmentStatus::Partial => write!(f, "partial"),
            AssignmentStatus::Unassigned => write!(f, "unassigned"),
        }
    }
}

/// Squarehead duty for one dance night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Assignment {
    /// `None` until the store has saved it.
    #[serde(default)]
    pub id: Option<AssignmentId>,
    #[serde(rename = "danceDate")]
    pub dance_date: DanceDate,
    #[serde(rename = "squarehead1Id", default)]
    pub squarehead1_id: Option<MemberId>,
    #[serde(rename = "squarehead2Id", default)]
    pub squarehead2_id: Option<MemberId>,
    #[serde(default)]
    pub notes: String,
}

impl Assignment {
    pub fn empty(dance_date: DanceDate) -> Self {
        Self {
            id: None,
            dance_date,
            squarehead1_id: None,
            squarehead2_id: None,
            notes: String::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.dance_date.date
    }

    pub fn night_type(&self) -> NightType {
        self.dance_date.night_type
    }

    pub fn status(&self) -> AssignmentStatus {
        match (self.squarehead1_id, self.squarehead2_id) {
            (Some(_), Some(_)) => AssignmentStatus::Complete,
            (None, None) => AssignmentStatus::Unassigned,
            _ => AssignmentStatus::Partial,
        }
    }

    /// Assigned members in slot order, without repeats.
    pub fn squareheads(&self) -> Vec<MemberId> {
        let mut ids = Vec::with_capacity(2);
        for id in [self.squarehead1_id, self.squarehead2_id].into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn involves(&self, member_id: MemberId) -> bool {
        self.squarehead1_id == Some(member_id) || self.squarehead2_id == Some(member_id)
    }

    /// The squarehead sharing the night with `member_id`, if any.
    pub fn partner_of(&self, member_id: MemberId) -> Option<MemberId> {
        match (self.squarehead1_id, self.squarehead2_id) {
            (Some(a), Some(b)) if a == member_id && b != member_id => Some(b),
            (Some(a), Some(b)) if b == member_id && a != member_id => Some(a),
            _ => None,
        }
    }

    /// Manual override of both slots. Board nights take no squareheads and the
    /// two slots must hold different members.
    pub fn set_squareheads(
        &mut self,
        first: Option<MemberId>,
        second: Option<MemberId>,
    ) -> Result<(), AssignmentError> {
        if !self.dance_date.needs_squareheads() && (first.is_some() || second.is_some()) {
            return Err(AssignmentError::BoardNight(self.dance_date.date));
        }
        if let (Some(a), Some(b)) = (first, second) {
            if a == b {
                return Err(AssignmentError::DuplicateSquarehead(a));
            }
        }
        self.squarehead1_id = first;
        self.squarehead2_id = second;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_derivation() {
        let mut a = Assignment::empty(DanceDate::normal(date("2025-06-04")));
        assert_eq!(a.status(), AssignmentStatus::Unassigned);
        a.squarehead2_id = Some(4);
        assert_eq!(a.status(), AssignmentStatus::Partial);
        a.squarehead1_id = Some(3);
        assert_eq!(a.status(), AssignmentStatus::Complete);
        assert_eq!(a.squareheads(), vec![3, 4]);
        assert_eq!(a.partner_of(3), Some(4));
        assert_eq!(a.partner_of(4), Some(3));
        assert_eq!(a.partner_of(5), None);
        assert!(a.involves(4));
        assert!(!a.involves(5));
    }

    #[test]
    fn test_set_squareheads_rejects_duplicates_and_board_nights() {
        let mut a = Assignment::empty(DanceDate::normal(date("2025-06-04")));
        assert_eq!(
            a.set_squareheads(Some(1), Some(1)),
            Err(AssignmentError::DuplicateSquarehead(1))
        );
        assert!(a.set_squareheads(Some(1), Some(2)).is_ok());
        assert!(a.set_squareheads(None, None).is_ok());
        assert_eq!(a.status(), AssignmentStatus::Unassigned);

        let mut board = Assignment::empty(DanceDate::fifth_wednesday(date("2025-07-30")));
        assert_eq!(
            board.set_squareheads(Some(1), None),
            Err(AssignmentError::BoardNight(date("2025-07-30")))
        );
        assert_eq!(
            board.set_squareheads(Some(1), None).unwrap_err().to_string(),
            "2025-07-30 is a board night and takes no squareheads"
        );
        assert!(board.set_squareheads(None, None).is_ok());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": 12,
            "danceDate": {"date": "2025-07-30", "nightType": "fifthWednesday"},
            "squarehead1Id": null
        }"#;
        let a: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.id, Some(12));
        assert_eq!(a.night_type(), NightType::FifthWednesday);
        assert_eq!(a.squarehead2_id, None);
        assert!(a.notes.is_empty());
    }
}
