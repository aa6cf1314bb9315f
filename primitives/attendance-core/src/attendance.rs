//! Attendee / non-attendee split for each ended call.

use crate::model::{AttendanceRow, Call, Member};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::warn;

/// A call left out of both reports because it carries no participant data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQualityWarning {
    pub call_index: usize,
    pub call_id: String,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "call {} ({}) has no participant data",
            self.call_index, self.call_id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub attended: Vec<AttendanceRow>,
    pub missed: Vec<AttendanceRow>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Splits `members` into attendees and non-attendees of every call.
///
/// Members are matched by id. Rows are grouped by call index, then follow the
/// call's participant order (attended) or the roster order (missed). A call
/// without participants contributes no rows and a warning.
pub fn reconcile(calls: &[Call], members: &[Member]) -> Reconciliation {
    let roster_names: HashMap<&str, &str> = members
        .iter()
        .map(|m| (m.id.as_str(), member_name(m)))
        .collect();

    let mut ordered: Vec<&Call> = calls.iter().collect();
    ordered.sort_by_key(|call| call.index);

    let mut result = Reconciliation::default();
    for call in ordered {
        let participants = match call.participants.as_deref() {
            Some(list) if !list.is_empty() => list,
            _ => {
                let warning = DataQualityWarning {
                    call_index: call.index,
                    call_id: call.id.clone(),
                };
                warn!(call = call.index, id = %call.id, "{warning}, excluding it from both reports");
                result.warnings.push(warning);
                continue;
            }
        };

        let mut present = HashSet::new();
        for participant in participants {
            if !present.insert(participant.id.as_str()) {
                continue;
            }
            let name = participant
                .display_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .or_else(|| roster_names.get(participant.id.as_str()).copied())
                .unwrap_or(participant.id.as_str());
            result.attended.push(row(call, name));
        }

        result.missed.extend(
            members
                .iter()
                .filter(|m| !present.contains(m.id.as_str()))
                .map(|m| row(call, member_name(m))),
        );
    }

    result
}

/// Display name, or the id when the platform sent no name.
fn member_name(member: &Member) -> &str {
    if member.display_name.is_empty() {
        &member.id
    } else {
        &member.display_name
    }
}

fn row(call: &Call, name: &str) -> AttendanceRow {
    AttendanceRow {
        call_index: call.index,
        timestamp: call.timestamp,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CallParticipant;
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn call(index: usize, participants: Option<Vec<CallParticipant>>) -> Call {
        Call {
            index,
            id: format!("call-{index}"),
            timestamp: at(1_000 + index as i64),
            participants,
        }
    }

    fn present(ids: &[&str]) -> Option<Vec<CallParticipant>> {
        Some(
            ids.iter()
                .map(|id| CallParticipant::new(*id, Some(*id)))
                .collect(),
        )
    }

    fn roster() -> Vec<Member> {
        vec![Member::new("A", "A"), Member::new("B", "B"), Member::new("C", "C")]
    }

    fn names(rows: &[AttendanceRow]) -> Vec<(usize, &str)> {
        rows.iter().map(|r| (r.call_index, r.name.as_str())).collect()
    }

    #[test]
    fn splits_roster_for_a_single_call() {
        let result = reconcile(&[call(0, present(&["A"]))], &roster());

        assert_eq!(
            result.attended,
            vec![AttendanceRow {
                call_index: 0,
                timestamp: at(1_000),
                name: "A".into()
            }]
        );
        assert_eq!(names(&result.missed), [(0, "B"), (0, "C")]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn call_without_participants_is_skipped_with_warning() {
        let calls = [call(0, Some(Vec::new())), call(1, None), call(2, present(&["B"]))];

        let result = reconcile(&calls, &roster());

        assert_eq!(names(&result.attended), [(2, "B")]);
        assert_eq!(names(&result.missed), [(2, "A"), (2, "C")]);
        let skipped: Vec<_> = result.warnings.iter().map(|w| w.call_index).collect();
        assert_eq!(skipped, [0, 1]);
    }

    #[test]
    fn membership_is_by_id_not_display_name() {
        let members = vec![Member::new("1", "Sam"), Member::new("2", "Sam")];
        let calls = [call(0, Some(vec![CallParticipant::new("1", Some("Sam"))]))];

        let result = reconcile(&calls, &members);

        assert_eq!(result.attended.len(), 1);
        assert_eq!(result.missed.len(), 1);
        assert_eq!(result.missed[0].name, "Sam");
    }

    #[test]
    fn rows_are_grouped_by_call_index() {
        let calls = [call(1, present(&["C", "A"])), call(0, present(&["B"]))];

        let result = reconcile(&calls, &roster());

        assert_eq!(names(&result.attended), [(0, "B"), (1, "C"), (1, "A")]);
        assert_eq!(names(&result.missed), [(0, "A"), (0, "C"), (1, "B")]);
    }

    #[test]
    fn missing_display_name_falls_back_to_roster_then_id() {
        let calls = [call(
            0,
            Some(vec![CallParticipant::new("A", None), CallParticipant::new("guest", None)]),
        )];

        let result = reconcile(&calls, &[Member::new("A", "Alice")]);

        assert_eq!(names(&result.attended), [(0, "Alice"), (0, "guest")]);
        assert!(result.missed.is_empty());
    }

    #[test]
    fn unnamed_roster_member_is_reported_by_id() {
        let members = vec![Member::new("A", ""), Member::new("B", "")];
        let calls = [call(0, Some(vec![CallParticipant::new("A", None)]))];

        let result = reconcile(&calls, &members);

        assert_eq!(names(&result.attended), [(0, "A")]);
        assert_eq!(names(&result.missed), [(0, "B")]);
    }

    #[test]
    fn repeated_participant_is_counted_once() {
        let result = reconcile(&[call(0, present(&["A", "A"]))], &roster());
        assert_eq!(result.attended.len(), 1);
    }

    #[test]
    fn reconciliation_is_repeatable() {
        let calls = [call(0, present(&["A", "C"])), call(1, None), call(2, present(&["B"]))];
        let members = roster();

        assert_eq!(reconcile(&calls, &members), reconcile(&calls, &members));
    }
}
