//! Error types for the attendance pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage that issued a failing platform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Logon,
    Roster,
    Feed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Logon => "logon",
            Stage::Roster => "participant roster",
            Stage::Feed => "conversation feed",
        };
        f.write_str(name)
    }
}

/// A platform request that was rejected or could not be completed.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Rejected `--start-date`/`--end-date` input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateWindowError {
    #[error("invalid date format {value:?}, expected YYYY/MM/DD")]
    InvalidDateFormat { value: String },

    #[error("start date {start} is after end date {end}")]
    Reversed { start: String, end: String },
}

/// Fatal errors that abort a reporting run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("configuration error: {0}")]
    InvalidDate(#[from] DateWindowError),

    #[error("{stage} request failed")]
    Transport {
        stage: Stage,
        #[source]
        source: TransportError,
    },

    #[error("feed pagination stalled: anchor {anchor} is not older than previous anchor {previous}")]
    PaginationStalled { previous: i64, anchor: i64 },

    #[error("participant pagination stalled: cursor {cursor:?} did not advance")]
    RosterStalled { cursor: Option<String> },

    #[error("failed to write report {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub(crate) fn transport(stage: Stage) -> impl FnOnce(TransportError) -> Self {
        move |source| ReportError::Transport { stage, source }
    }

    /// True for errors raised before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReportError::Configuration(_) | ReportError::InvalidDate(_)
        )
    }
}
