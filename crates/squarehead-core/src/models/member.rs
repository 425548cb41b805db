use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

pub type MemberId = i64;

/// Duty status of a club member. Only `Assignable` members take squarehead duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Assignable,
    Exempt,
    Booster,
    Loa,
}

impl MemberStatus {
    pub fn is_assignable(&self) -> bool {
        matches!(self, MemberStatus::Assignable)
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Assignable => write!(f, "assignable"),
            MemberStatus::Exempt => write!(f, "exempt"),
            MemberStatus::Booster => write!(f, "booster"),
            MemberStatus::Loa => write!(f, "loa"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assignable" => Ok(MemberStatus::Assignable),
            "exempt" => Ok(MemberStatus::Exempt),
            "booster" => Ok(MemberStatus::Booster),
            "loa" | "leave" => Ok(MemberStatus::Loa),
            other => Err(format!("Unknown member status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Member {
    pub id: MemberId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(rename = "partnerId", default)]
    pub partner_id: Option<MemberId>,
    #[serde(rename = "friendId", default)]
    pub friend_id: Option<MemberId>,
}

impl Member {
    pub fn new(id: MemberId, first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            status: MemberStatus::Assignable,
            partner_id: None,
            friend_id: None,
        }
    }

    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_partner(mut self, partner_id: MemberId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_friend(mut self, friend_id: MemberId) -> Self {
        self.friend_id = Some(friend_id);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn is_assignable(&self) -> bool {
        self.status.is_assignable()
    }

    /// Lowercased, trimmed email used for uniqueness checks.
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }

    /// Checks the invariants a single record must hold on its own.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DirectoryError::InvalidEmail(self.email.clone()));
        }
        if self.partner_id == Some(self.id) || self.friend_id == Some(self.id) {
            return Err(DirectoryError::SelfReference(self.id));
        }
        if self.partner_id.is_some() && self.partner_id == self.friend_id {
            return Err(DirectoryError::PartnerIsFriend(self.id));
        }
        Ok(())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        let m = Member::new(1, "Ada", "Lovelace", "ada@example.org");
        assert_eq!(m.full_name(), "Ada Lovelace");
        assert_eq!(m.display_name(), "Lovelace, Ada");
    }

    #[test]
    fn test_status_parse_and_eligibility() {
        assert_eq!("LOA".parse::<MemberStatus>(), Ok(MemberStatus::Loa));
        assert_eq!(" booster ".parse::<MemberStatus>(), Ok(MemberStatus::Booster));
        assert!("retired".parse::<MemberStatus>().is_err());
        assert!(MemberStatus::Assignable.is_assignable());
        assert!(!MemberStatus::Exempt.is_assignable());
    }

    #[test]
    fn test_validate_rejects_bad_references() {
        let m = Member::new(1, "A", "A", "a@example.org").with_partner(1);
        assert_eq!(m.validate(), Err(DirectoryError::SelfReference(1)));

        let m = Member::new(1, "A", "A", "a@example.org").with_partner(2).with_friend(2);
        assert_eq!(m.validate(), Err(DirectoryError::PartnerIsFriend(1)));

        let m = Member::new(1, "A", "A", "not-an-email");
        assert!(matches!(m.validate(), Err(DirectoryError::InvalidEmail(_))));

        let m = Member::new(1, "A", "A", "a@example.org").with_partner(2).with_friend(3);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_serde_field_names() {
        let m = Member::new(7, "Bo", "Peep", "bo@example.org").with_partner(8);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["firstName"], "Bo");
        assert_eq!(json["partnerId"], 8);
        assert_eq!(json["status"], "assignable");

        let parsed: Member = serde_json::from_str(
            r#"{"id":3,"firstName":"C","lastName":"D","email":"c@d.org"}"#,
        )
        .unwrap();
        assert_eq!(parsed.status, MemberStatus::Assignable);
        assert_eq!(parsed.friend_id, None);
    }
}
