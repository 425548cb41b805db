//! Squarehead rotation.
//!
//! Members rotate in cycles: everyone assignable serves once before anyone
//! serves again. Within a cycle members are taken in order of
//! (duty count, last night served, id). The second slot of a night goes to
//! the first member's partner, then their friend, then whoever is next in
//! rotation. When only one member is left in a cycle the night is filled
//! partially and the next cycle starts on the following night.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeDelta};
use tracing::{debug, warn};

use crate::error::{Result, SquareheadError};
use crate::models::{Assignment, DanceDate, Member, MemberId};

/// Default window of prior assignments that count towards rotation order.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// How far before the first generated night prior assignments still count.
    pub lookback_days: i64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Clone)]
struct RotationEntry {
    id: MemberId,
    partner_id: Option<MemberId>,
    friend_id: Option<MemberId>,
    /// Duties served beyond the least-served member in the pool.
    level: u32,
    last_used: Option<NaiveDate>,
}

struct Rotation {
    entries: BTreeMap<MemberId, RotationEntry>,
}

impl Rotation {
    fn new(eligible: &[&Member], prior: &[Assignment], window: (NaiveDate, NaiveDate)) -> Self {
        let (window_start, window_end) = window;
        let mut counts: HashMap<MemberId, u32> = HashMap::new();
        let mut last_used: HashMap<MemberId, NaiveDate> = HashMap::new();

        for assignment in prior {
            let date = assignment.date();
            if !assignment.dance_date.needs_squareheads() || date < window_start || date >= window_end {
                continue;
            }
            for id in assignment.squareheads() {
                *counts.entry(id).or_default() += 1;
                let last = last_used.entry(id).or_insert(date);
                if date > *last {
                    *last = date;
                }
            }
        }

        let min = eligible
            .iter()
            .map(|m| counts.get(&m.id).copied().unwrap_or(0))
            .min()
            .unwrap_or(0);

        let entries = eligible
            .iter()
            .map(|m| {
                let count = counts.get(&m.id).copied().unwrap_or(0);
                let entry = RotationEntry {
                    id: m.id,
                    partner_id: m.partner_id,
                    friend_id: m.friend_id,
                    // Members ahead by n duties sit out n cycles before
                    // serving again.
                    level: count - min,
                    last_used: last_used.get(&m.id).copied(),
                };
                (m.id, entry)
            })
            .collect();

        Self { entries }
    }

    /// Members still due in the current cycle, in rotation order.
    fn available(&self) -> Vec<&RotationEntry> {
        let Some(level) = self.entries.values().map(|e| e.level).min() else {
            return Vec::new();
        };
        let mut available: Vec<&RotationEntry> =
            self.entries.values().filter(|e| e.level == level).collect();
        available.sort_by(|a, b| a.last_used.cmp(&b.last_used).then_with(|| a.id.cmp(&b.id)));
        available
    }

    fn pick(&self) -> (Option<MemberId>, Option<MemberId>) {
        let available = self.available();
        let Some((first, rest)) = available.split_first() else {
            return (None, None);
        };

        let partner = first.partner_id.and_then(|pid| {
            rest.iter()
                .find(|e| e.id == pid && e.last_used <= first.last_used)
                .map(|e| e.id)
        });
        let friend = || {
            first
                .friend_id
                .and_then(|fid| rest.iter().find(|e| e.id == fid).map(|e| e.id))
        };
        let second = partner
            .or_else(friend)
            .or_else(|| rest.first().map(|e| e.id));

        (Some(first.id), second)
    }

    fn mark_used(&mut self, id: MemberId, date: NaiveDate) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.level += 1;
            entry.last_used = Some(date);
        }
    }
}

/// Proposes assignments for `dates` using the default lookback window.
pub fn generate(
    dates: &[DanceDate],
    members: &[Member],
    prior: &[Assignment],
) -> Result<Vec<Assignment>> {
    generate_with(dates, members, prior, &GenerateOptions::default())
}

/// Proposes one assignment per dance night, in date order.
///
/// `prior` supplies rotation history. A prior assignment on a night being
/// generated is replaced: its id and notes carry over to the proposal but its
/// squareheads do not count towards rotation.
pub fn generate_with(
    dates: &[DanceDate],
    members: &[Member],
    prior: &[Assignment],
    options: &GenerateOptions,
) -> Result<Vec<Assignment>> {
    let mut nights = dates.to_vec();
    nights.sort_by_key(|d| d.date);
    let first_date = nights.first().map(|d| d.date).ok_or(SquareheadError::NoDanceDates)?;
    if let Some(pair) = nights.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(SquareheadError::DuplicateDanceDate(pair[0].date));
    }

    let eligible: Vec<&Member> = members.iter().filter(|m| m.is_assignable()).collect();
    if eligible.len() < 2 {
        return Err(SquareheadError::InsufficientMembers {
            eligible: eligible.len(),
        });
    }

    let window_start = TimeDelta::try_days(options.lookback_days.max(0))
        .and_then(|lookback| first_date.checked_sub_signed(lookback))
        .unwrap_or(NaiveDate::MIN);
    let mut rotation = Rotation::new(&eligible, prior, (window_start, first_date));
    let existing: HashMap<NaiveDate, &Assignment> =
        prior.iter().map(|a| (a.date(), a)).collect();

    debug!(
        nights = nights.len(),
        eligible = eligible.len(),
        from = %first_date,
        "Generating squarehead schedule"
    );

    let mut proposals = Vec::with_capacity(nights.len());
    for night in nights {
        let mut assignment = Assignment::empty(night);
        if let Some(previous) = existing.get(&night.date) {
            assignment.id = previous.id;
            assignment.notes = previous.notes.clone();
        }

        if night.needs_squareheads() {
            let (first, second) = rotation.pick();
            for id in [first, second].into_iter().flatten() {
                rotation.mark_used(id, night.date);
            }
            assignment.squarehead1_id = first;
            assignment.squarehead2_id = second;
            if second.is_none() {
                warn!(date = %night.date, "Rotation exhausted, night only partially filled");
            }
            debug!(date = %night.date, first = ?first, second = ?second, "Assigned squareheads");
        }

        proposals.push(assignment);
    }
    Ok(proposals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::models::{AssignmentStatus, MemberStatus};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn member(id: MemberId) -> Member {
        Member::new(id, &format!("F{}", id), &format!("L{}", id), &format!("m{}@club.org", id))
    }

    fn weekly(start: &str, n: i64) -> Vec<DanceDate> {
        let start = date(start);
        (0..n)
            .map(|i| DanceDate::normal(start + TimeDelta::days(7 * i)))
            .collect()
    }

    fn pairs(assignments: &[Assignment]) -> Vec<(Option<MemberId>, Option<MemberId>)> {
        assignments
            .iter()
            .map(|a| (a.squarehead1_id, a.squarehead2_id))
            .collect()
    }

    #[test]
    fn test_partner_scenario_with_three_members() {
        let members = vec![member(1), member(2).with_partner(1), member(3)];
        let dates = vec![
            DanceDate::normal(date("2025-06-04")),
            DanceDate::normal(date("2025-06-11")),
        ];

        let result = generate(&dates, &members, &[]).unwrap();
        assert_eq!(pairs(&result), vec![(Some(1), Some(2)), (Some(3), None)]);
        assert_eq!(result[0].status(), AssignmentStatus::Complete);
        assert_eq!(result[1].status(), AssignmentStatus::Partial);
    }

    #[test]
    fn test_insufficient_members() {
        let members = vec![member(1), member(2).with_status(MemberStatus::Exempt)];
        let err = generate(&weekly("2025-06-04", 2), &members, &[]).unwrap_err();
        assert_eq!(err, SquareheadError::InsufficientMembers { eligible: 1 });
    }

    #[test]
    fn test_rejects_empty_and_duplicate_dates() {
        let members = vec![member(1), member(2)];
        assert_eq!(generate(&[], &members, &[]), Err(SquareheadError::NoDanceDates));

        let dates = vec![
            DanceDate::normal(date("2025-06-11")),
            DanceDate::normal(date("2025-06-04")),
            DanceDate::fifth_wednesday(date("2025-06-11")),
        ];
        assert_eq!(
            generate(&dates, &members, &[]),
            Err(SquareheadError::DuplicateDanceDate(date("2025-06-11")))
        );
    }

    #[test]
    fn test_rotation_is_fair_across_cycles() {
        for pool in 4..=7 {
            let members: Vec<Member> = (1..=pool).map(member).collect();
            let result = generate(&weekly("2025-01-01", 23), &members, &[]).unwrap();

            let mut counts: HashMap<MemberId, usize> = HashMap::new();
            for a in &result {
                for id in a.squareheads() {
                    *counts.entry(id).or_default() += 1;
                }
            }
            assert_eq!(counts.len() as i64, pool, "every member serves");
            let max = counts.values().max().copied().unwrap_or(0);
            let min = counts.values().min().copied().unwrap_or(0);
            assert!(max - min <= 1, "pool {}: counts {:?}", pool, counts);
        }
    }

    #[test]
    fn test_slots_never_repeat_a_member() {
        let members: Vec<Member> = vec![
            member(1).with_partner(2),
            member(2).with_partner(1),
            member(3).with_friend(1),
            member(4),
            member(5).with_friend(3),
        ];
        let result = generate(&weekly("2025-01-01", 30), &members, &[]).unwrap();
        for a in &result {
            if let (Some(x), Some(y)) = (a.squarehead1_id, a.squarehead2_id) {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn test_fifth_wednesday_skipped_and_not_counted() {
        let members: Vec<Member> = (1..=4).map(member).collect();
        let dates = vec![
            DanceDate::normal(date("2025-07-23")),
            DanceDate::fifth_wednesday(date("2025-07-30")),
            DanceDate::normal(date("2025-08-06")),
        ];
        let result = generate(&dates, &members, &[]).unwrap();
        assert_eq!(
            pairs(&result),
            vec![(Some(1), Some(2)), (None, None), (Some(3), Some(4))]
        );

        // A board night in history does not move anyone in the rotation.
        let mut prior_board = Assignment::empty(DanceDate::fifth_wednesday(date("2025-04-30")));
        prior_board.squarehead1_id = Some(1);
        let result = generate(&dates, &members, &[prior_board]).unwrap();
        assert_eq!(result[0].squareheads(), vec![1, 2]);
    }

    #[test]
    fn test_no_back_to_back_pair_with_three_or_more() {
        let members: Vec<Member> = (1..=4).map(member).collect();
        let result = generate(&weekly("2025-01-01", 12), &members, &[]).unwrap();
        for w in result.windows(2) {
            assert_ne!(w[0].squareheads(), w[1].squareheads());
        }
    }

    #[test]
    fn test_partner_preferred_over_rotation() {
        let members = vec![
            member(1).with_partner(3),
            member(2),
            member(3).with_partner(1),
            member(4),
        ];
        let result = generate(&weekly("2025-01-01", 4), &members, &[]).unwrap();
        assert_eq!(
            pairs(&result),
            vec![
                (Some(1), Some(3)),
                (Some(2), Some(4)),
                (Some(1), Some(3)),
                (Some(2), Some(4)),
            ]
        );
    }

    #[test]
    fn test_friend_preferred_when_no_partner() {
        let members = vec![member(1).with_friend(4), member(2), member(3), member(4)];
        let result = generate(&weekly("2025-01-01", 2), &members, &[]).unwrap();
        assert_eq!(pairs(&result), vec![(Some(1), Some(4)), (Some(2), Some(3))]);
    }

    #[test]
    fn test_partner_wins_over_friend() {
        let members = vec![
            member(1).with_partner(2).with_friend(3),
            member(2).with_partner(1),
            member(3),
        ];
        let result = generate(&weekly("2025-01-01", 1), &members, &[]).unwrap();
        assert_eq!(pairs(&result), vec![(Some(1), Some(2))]);
    }

    #[test]
    fn test_prior_history_sets_rotation_order() {
        let members = vec![
            member(1).with_partner(2),
            member(2).with_partner(1),
            member(3),
            member(4),
        ];
        let mut last_week = Assignment::empty(DanceDate::normal(date("2024-12-25")));
        last_week.squarehead1_id = Some(2);
        last_week.squarehead2_id = Some(3);

        let result = generate(&weekly("2025-01-01", 1), &members, &[last_week]).unwrap();
        // 2 and 3 already served this cycle, so 1 cannot have their partner.
        assert_eq!(pairs(&result), vec![(Some(1), Some(4))]);
    }

    #[test]
    fn test_larger_duty_gaps_are_kept() {
        let members: Vec<Member> = (1..=5).map(member).collect();
        let mut prior = Vec::new();
        for day in ["2024-10-02", "2024-10-09", "2024-10-16"] {
            let mut night = Assignment::empty(DanceDate::normal(date(day)));
            night.squarehead1_id = Some(4);
            night.squarehead2_id = Some(5);
            prior.push(night);
        }
        let mut solo = Assignment::empty(DanceDate::normal(date("2024-12-25")));
        solo.squarehead1_id = Some(3);
        prior.push(solo);

        let result = generate(&weekly("2025-01-01", 2), &members, &prior).unwrap();
        // 3 has one duty, 4 and 5 have three each: 3 serves before either.
        assert_eq!(pairs(&result), vec![(Some(1), Some(2)), (Some(3), Some(1))]);
    }

    #[test]
    fn test_huge_lookback_does_not_overflow() {
        let members: Vec<Member> = (1..=4).map(member).collect();
        let mut old = Assignment::empty(DanceDate::normal(date("1900-01-03")));
        old.squarehead1_id = Some(1);
        old.squarehead2_id = Some(2);

        for lookback_days in [200_000_000, i64::MAX] {
            let options = GenerateOptions { lookback_days };
            let result =
                generate_with(&weekly("2025-01-01", 1), &members, &[old.clone()], &options).unwrap();
            assert_eq!(pairs(&result), vec![(Some(3), Some(4))]);
        }
    }

    #[test]
    fn test_history_outside_lookback_is_ignored() {
        let members: Vec<Member> = (1..=4).map(member).collect();
        let mut old = Assignment::empty(DanceDate::normal(date("2023-01-04")));
        old.squarehead1_id = Some(1);
        old.squarehead2_id = Some(2);

        let options = GenerateOptions { lookback_days: 90 };
        let result = generate_with(&weekly("2025-01-01", 1), &members, &[old], &options).unwrap();
        assert_eq!(pairs(&result), vec![(Some(1), Some(2))]);
    }

    #[test]
    fn test_regeneration_keeps_id_and_notes() {
        let members: Vec<Member> = (1..=4).map(member).collect();
        let mut existing = Assignment::empty(DanceDate::normal(date("2025-01-01")));
        existing.id = Some(42);
        existing.notes = "bring coffee".to_string();
        existing.squarehead1_id = Some(3);
        existing.squarehead2_id = Some(4);

        let result = generate(&weekly("2025-01-01", 1), &members, &[existing]).unwrap();
        assert_eq!(result[0].id, Some(42));
        assert_eq!(result[0].notes, "bring coffee");
        // the replaced night does not count as history
        assert_eq!(result[0].squareheads(), vec![1, 2]);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let members: Vec<Member> = (1..=6).map(member).collect();
        let dates = weekly("2025-01-01", 10);
        let a = generate(&dates, &members, &[]).unwrap();
        let b = generate(&dates, &members, &[]).unwrap();
        assert_eq!(a, b);
    }
}
