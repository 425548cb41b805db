//! Email senders available from the command line.

use std::path::PathBuf;

use squarehead_core::{Dispatch, EmailSender, SendError};
use tracing::info;

use crate::render::compose;

/// Writes each rendered reminder into an outbox directory, one file per
/// message, for a mail relay to pick up.
pub struct OutboxSender {
    dir: PathBuf,
    club_name: String,
    from: String,
}

impl OutboxSender {
    pub fn new(dir: PathBuf, club_name: &str, from: &str) -> Result<Self, SendError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            club_name: club_name.to_string(),
            from: from.to_string(),
        })
    }

    fn file_name(dispatch: &Dispatch) -> String {
        format!(
            "{}_{}_{}d.eml",
            dispatch.dance_date.format("%Y%m%d"),
            dispatch.member_id,
            dispatch.days_until
        )
    }
}

impl EmailSender for OutboxSender {
    fn send(&self, dispatch: &Dispatch) -> Result<(), SendError> {
        if !dispatch.recipient_email.contains('@') {
            return Err(SendError::Rejected(dispatch.recipient_email.clone()));
        }
        let message = compose(dispatch, &self.club_name, &self.from);
        let path = self.dir.join(Self::file_name(dispatch));
        std::fs::write(&path, message.to_text())?;
        info!(to = %message.to, path = %path.display(), "Reminder queued in outbox");
        Ok(())
    }
}

/// Logs what would be sent and sends nothing.
pub struct DryRunSender {
    club_name: String,
    from: String,
}

impl DryRunSender {
    pub fn new(club_name: &str, from: &str) -> Self {
        Self {
            club_name: club_name.to_string(),
            from: from.to_string(),
        }
    }
}

impl EmailSender for DryRunSender {
    fn send(&self, dispatch: &Dispatch) -> Result<(), SendError> {
        let message = compose(dispatch, &self.club_name, &self.from);
        println!("--- would send ---\n{}", message.to_text());
        Ok(())
    }
}
