//! Attendance Core - Conference Call Attendance Reconciliation
//!
//! Walks a conversation feed backward in time, isolates ended conference calls
//! inside an optional date window, and splits the conversation roster into
//! attendees and non-attendees for every call.
//!
//! The remote platform is reached through the [`Session`] trait, so the whole
//! pipeline runs unchanged against the HTTP client in `attendance-report` or
//! against a scripted session in tests.
//!
//! # Pipeline
//!
//! ```text
//! DateWindow -> ParticipantCollector -> FeedPaginator -> select_ended_calls
//!            -> reconcile -> ReportWriter
//! ```
//!
//! Every stage is awaited in order. A failing request aborts the run before
//! any report file is written.

pub mod attendance;
pub mod calls;
pub mod error;
pub mod feed;
pub mod model;
pub mod participants;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use attendance::{DataQualityWarning, Reconciliation, reconcile};
pub use calls::select_ended_calls;
pub use error::{DateWindowError, ReportError, Stage, TransportError};
pub use feed::FeedPaginator;
pub use model::{AttendanceRow, Call, CallParticipant, FeedEvent, ItemType, Member, RtcInfo, RtcState};
pub use participants::ParticipantCollector;
pub use pipeline::{AttendanceReport, build_report};
pub use report::{ReportPaths, ReportWriter};
pub use session::{FeedPage, FeedQuery, ParticipantPage, ParticipantQuery, Session};
pub use window::DateWindow;
