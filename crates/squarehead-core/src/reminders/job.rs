//! The daily reminder run: select, resolve, filter already-sent, deliver.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::dispatch::{build_dispatches, Dispatch, DispatchPlan, SendKey, SkippedHit};
use super::selector::{select_due, ReminderHit};
use super::send_log::SendLog;
use crate::repository::{AssignmentRepository, EmailSender, MemberRepository, SettingsProvider};

/// What a reminder run would send, without sending it.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderPreview {
    #[serde(rename = "referenceDate")]
    pub reference_date: NaiveDate,
    pub hits: Vec<ReminderHit>,
    pub plan: DispatchPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSend {
    pub key: SendKey,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderRunReport {
    #[serde(rename = "referenceDate")]
    pub reference_date: NaiveDate,
    pub sent: Vec<Dispatch>,
    #[serde(rename = "alreadySent")]
    pub already_sent: usize,
    pub skipped: Vec<SkippedHit>,
    pub failed: Vec<FailedSend>,
}

impl ReminderRunReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

pub struct ReminderJob<'a> {
    pub members: &'a dyn MemberRepository,
    pub assignments: &'a dyn AssignmentRepository,
    pub settings: &'a dyn SettingsProvider,
}

impl<'a> ReminderJob<'a> {
    pub fn new(
        members: &'a dyn MemberRepository,
        assignments: &'a dyn AssignmentRepository,
        settings: &'a dyn SettingsProvider,
    ) -> Self {
        Self {
            members,
            assignments,
            settings,
        }
    }

    /// Reminders due on `reference`, resolved to recipients.
    pub fn preview(&self, reference: NaiveDate) -> Result<ReminderPreview> {
        let offsets = self.settings.reminder_offsets()?;
        let assignments = self.assignments.all_assignments()?;
        let hits = select_due(reference, &assignments, &offsets)?;
        let members = self.members.list_members()?;
        let plan = build_dispatches(&hits, &members);
        debug!(
            date = %reference,
            hits = hits.len(),
            dispatches = plan.dispatches.len(),
            "Reminder preview built"
        );
        Ok(ReminderPreview {
            reference_date: reference,
            hits,
            plan,
        })
    }

    /// Sends every due reminder not yet in `log`. Successful sends are
    /// recorded in `log`; failures are reported and left for the next run.
    pub fn run(
        &self,
        reference: NaiveDate,
        sender: &dyn EmailSender,
        log: &mut SendLog,
    ) -> Result<ReminderRunReport> {
        let preview = self.preview(reference)?;
        let pruned = log.prune_before(reference);
        if pruned > 0 {
            debug!(pruned, "Pruned send log");
        }

        let mut report = ReminderRunReport {
            reference_date: reference,
            sent: Vec::new(),
            already_sent: 0,
            skipped: preview.plan.skipped,
            failed: Vec::new(),
        };

        for dispatch in preview.plan.dispatches {
            let key = dispatch.send_key();
            if log.contains(&key) {
                report.already_sent += 1;
                continue;
            }
            match sender.send(&dispatch) {
                Ok(()) => {
                    log.record(key);
                    report.sent.push(dispatch);
                }
                Err(e) => {
                    warn!(member_id = key.member_id, date = %key.dance_date, error = %e, "Reminder send failed");
                    report.failed.push(FailedSend {
                        key,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            date = %reference,
            sent = report.sent.len(),
            already_sent = report.already_sent,
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Reminder run finished"
        );
        Ok(report)
    }
}
