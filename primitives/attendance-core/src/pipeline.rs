//! End-to-end assembly of one reporting run.

use crate::attendance::{DataQualityWarning, Reconciliation, reconcile};
use crate::calls::select_ended_calls;
use crate::error::ReportError;
use crate::feed::FeedPaginator;
use crate::model::{AttendanceRow, Call};
use crate::participants::ParticipantCollector;
use crate::session::Session;
use crate::window::DateWindow;
use tracing::info;

/// Everything a run produces before the report files are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceReport {
    pub calls: Vec<Call>,
    pub attended: Vec<AttendanceRow>,
    pub missed: Vec<AttendanceRow>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Collects the roster and the ended calls inside `window`, then reconciles them.
///
/// Nothing is written here; a failed request surfaces before any report exists.
pub async fn build_report<S: Session>(
    session: &S,
    conversation_id: &str,
    window: &DateWindow,
) -> Result<AttendanceReport, ReportError> {
    if conversation_id.trim().is_empty() {
        return Err(ReportError::Configuration(
            "conversationId is not set".to_string(),
        ));
    }

    let members = ParticipantCollector::new(session)
        .collect_all(conversation_id, session.own_member_id())
        .await?;

    let mut events = FeedPaginator::new(session)
        .collect_calls_since(conversation_id, window)
        .await?;
    events.retain(|event| window.contains(event.timestamp));

    let calls = select_ended_calls(events);
    info!(calls = calls.len(), "selected ended conference calls");

    let Reconciliation {
        attended,
        missed,
        warnings,
    } = reconcile(&calls, &members);
    info!(
        attended = attended.len(),
        missed = missed.len(),
        skipped = warnings.len(),
        "reconciled attendance"
    );

    Ok(AttendanceReport {
        calls,
        attended,
        missed,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::report::ReportWriter;
    use crate::testing::{BOT_ID, ScriptedSession, member, rtc_thread, text_thread};
    use chrono::Utc;

    #[tokio::test]
    async fn single_call_end_to_end() {
        let session = ScriptedSession::new()
            .participants(&[member("a"), member("b"), member(BOT_ID), member("c")], false)
            .feed(
                vec![
                    text_thread("hello", 2_000),
                    rtc_thread("call", 1_000, "ENDED", Some(&["a", "b"])),
                ],
                false,
            );

        let report = build_report(&session, "conv", &DateWindow::unbounded())
            .await
            .unwrap();

        assert_eq!(report.calls.len(), 1);
        assert_eq!(report.attended.len(), 2);
        assert_eq!(report.missed.len(), 1);
        assert_eq!(report.missed[0].name, "Name c");
        assert!(report.attended.iter().chain(&report.missed).all(|r| r.call_index == 0));

        let dir = tempfile::tempdir().unwrap();
        let paths = ReportWriter::new(dir.path())
            .with_time_zone(Utc)
            .write(&report)
            .await
            .unwrap();
        let attenders = std::fs::read_to_string(paths.attenders).unwrap();
        let non_attenders = std::fs::read_to_string(paths.non_attenders).unwrap();
        assert_eq!(attenders.lines().skip(1).count(), 2);
        assert_eq!(non_attenders.lines().skip(1).count(), 1);
        assert!(non_attenders.lines().nth(1).unwrap().starts_with("0,"));
    }

    #[tokio::test]
    async fn window_drops_calls_outside_the_dates() {
        let day = 86_400_000;
        let session = ScriptedSession::new()
            .participants(&[member("a")], false)
            .feed(
                vec![
                    rtc_thread("after", 5 * day, "ENDED", Some(&["a"])),
                    rtc_thread("inside", 2 * day + 5, "ENDED", Some(&["a"])),
                    rtc_thread("before", day - 5, "ENDED", Some(&["a"])),
                ],
                true,
            );
        let window = DateWindow::parse_in(&Utc, Some("1970/01/02"), Some("1970/01/03")).unwrap();

        let report = build_report(&session, "conv", &window).await.unwrap();

        let ids: Vec<_> = report.calls.iter().map(|c| (c.index, c.id.as_str())).collect();
        assert_eq!(ids, [(0, "inside")]);
        assert_eq!(session.feed_queries.borrow().len(), 1);
    }

    #[tokio::test]
    async fn missing_conversation_is_rejected_before_any_request() {
        let session = ScriptedSession::new();

        let err = build_report(&session, " ", &DateWindow::unbounded())
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(session.participant_queries.borrow().is_empty());
        assert!(session.feed_queries.borrow().is_empty());
    }

    #[tokio::test]
    async fn roster_failure_stops_before_feed() {
        let session = ScriptedSession::new().participants_fail();

        let err = build_report(&session, "conv", &DateWindow::unbounded())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReportError::Transport {
                stage: Stage::Roster,
                ..
            }
        ));
        assert!(session.feed_queries.borrow().is_empty());
    }
}
