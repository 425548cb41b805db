use chrono::NaiveDate;
use thiserror::Error;

/// Failures of the scheduling and reminder operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareheadError {
    #[error("Not enough assignable members to build a schedule ({eligible} found, need at least 2)")]
    InsufficientMembers { eligible: usize },

    #[error("No dance dates given")]
    NoDanceDates,

    #[error("Dance date {0} appears more than once")]
    DuplicateDanceDate(NaiveDate),

    #[error("Reminder offset must be zero or more days, got {0}")]
    InvalidOffset(i64),
}

/// Writes rejected by the member directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Member not found: {0}")]
    UnknownMember(i64),

    #[error("A member with id {0} already exists")]
    DuplicateId(i64),

    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Member {0} cannot reference themselves as partner or friend")]
    SelfReference(i64),

    #[error("Member {0} has the same person as partner and friend")]
    PartnerIsFriend(i64),

    #[error("Member {partner} is already partnered with member {current}")]
    PartnerTaken { partner: i64, current: i64 },

    #[error("Member {member} lists {partner} as partner but not the other way round")]
    AsymmetricPartner { member: i64, partner: i64 },
}

/// Manual assignment edits that would break a night's slots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("{0} is a board night and takes no squareheads")]
    BoardNight(NaiveDate),

    #[error("Member {0} cannot fill both squarehead slots")]
    DuplicateSquarehead(i64),
}

/// Delivery failure reported by an email sender.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Recipient rejected: {0}")]
    Rejected(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SquareheadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SquareheadError::InsufficientMembers { eligible: 1 };
        assert_eq!(
            err.to_string(),
            "Not enough assignable members to build a schedule (1 found, need at least 2)"
        );
        assert_eq!(
            SquareheadError::InvalidOffset(-3).to_string(),
            "Reminder offset must be zero or more days, got -3"
        );

        let err = DirectoryError::PartnerTaken { partner: 4, current: 9 };
        assert_eq!(err.to_string(), "Member 4 is already partnered with member 9");
    }
}
