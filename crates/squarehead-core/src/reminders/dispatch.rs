use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::selector::ReminderHit;
use crate::models::{Member, MemberId, NightType};

/// Everything a message renderer needs for one reminder email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Dispatch {
    #[serde(rename = "memberId")]
    pub member_id: MemberId,
    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,
    #[serde(rename = "recipientName")]
    pub recipient_name: String,
    #[serde(rename = "danceDate")]
    pub dance_date: NaiveDate,
    #[serde(rename = "daysUntil")]
    pub days_until: i64,
    #[serde(rename = "partnerName", default)]
    pub partner_name: Option<String>,
    #[serde(rename = "nightType")]
    pub night_type: NightType,
}

impl Dispatch {
    /// Key the send log uses to suppress repeats of the same reminder.
    pub fn send_key(&self) -> SendKey {
        SendKey {
            member_id: self.member_id,
            dance_date: self.dance_date,
            offset_days: self.days_until,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SendKey {
    #[serde(rename = "memberId")]
    pub member_id: MemberId,
    #[serde(rename = "danceDate")]
    pub dance_date: NaiveDate,
    #[serde(rename = "offsetDays")]
    pub offset_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The member id is not in the directory (deleted or never existed).
    UnresolvedMember,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnresolvedMember => write!(f, "member not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SkippedHit {
    pub hit: ReminderHit,
    pub reason: SkipReason,
}

/// Dispatches ready to send, plus hits that could not be turned into one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DispatchPlan {
    pub dispatches: Vec<Dispatch>,
    pub skipped: Vec<SkippedHit>,
}

/// Resolves hits against the roster. One dispatch per (member, dance night);
/// the first hit wins. Unknown members are reported in `skipped`.
pub fn build_dispatches(hits: &[ReminderHit], members: &[Member]) -> DispatchPlan {
    let roster: HashMap<MemberId, &Member> = members.iter().map(|m| (m.id, m)).collect();
    let mut seen: HashSet<(MemberId, NaiveDate)> = HashSet::new();
    let mut plan = DispatchPlan::default();

    for hit in hits {
        let Some(member) = roster.get(&hit.member_id) else {
            warn!(member_id = hit.member_id, date = %hit.dance_date, "Reminder for unknown member skipped");
            plan.skipped.push(SkippedHit {
                hit: hit.clone(),
                reason: SkipReason::UnresolvedMember,
            });
            continue;
        };
        if !seen.insert((hit.member_id, hit.dance_date)) {
            continue;
        }

        let partner_name = hit
            .partner_member_id
            .and_then(|id| roster.get(&id))
            .map(|p| p.full_name());

        plan.dispatches.push(Dispatch {
            member_id: member.id,
            recipient_email: member.email.trim().to_string(),
            recipient_name: member.full_name(),
            dance_date: hit.dance_date,
            days_until: hit.days_until,
            partner_name,
            night_type: hit.night_type,
        });
    }
    plan
}
