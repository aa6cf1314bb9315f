//! CSV output for the attenders and non-attenders reports.

use crate::error::ReportError;
use crate::model::AttendanceRow;
use crate::pipeline::AttendanceReport;
use chrono::{Local, TimeZone};
use std::fmt::{Display, Write as _};
use std::path::{Path, PathBuf};
use tracing::info;

pub const HEADER: &str = "conferenceId,date,participantName";
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const ATTENDERS_FILE: &str = "attenders.csv";
pub const NON_ATTENDERS_FILE: &str = "non-attenders.csv";

/// Where the two reports were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub attenders: PathBuf,
    pub non_attenders: PathBuf,
}

/// Renders rows as CSV and writes the two report files.
#[derive(Debug, Clone)]
pub struct ReportWriter<Tz: TimeZone = Local> {
    out_dir: PathBuf,
    attenders_file: String,
    non_attenders_file: String,
    tz: Tz,
}

impl ReportWriter<Local> {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            attenders_file: ATTENDERS_FILE.to_string(),
            non_attenders_file: NON_ATTENDERS_FILE.to_string(),
            tz: Local,
        }
    }
}

impl<Tz> ReportWriter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Renders timestamps in `tz` instead of the local time zone.
    pub fn with_time_zone<T: TimeZone>(self, tz: T) -> ReportWriter<T> {
        ReportWriter {
            out_dir: self.out_dir,
            attenders_file: self.attenders_file,
            non_attenders_file: self.non_attenders_file,
            tz,
        }
    }

    pub fn with_file_names(
        mut self,
        attenders: impl Into<String>,
        non_attenders: impl Into<String>,
    ) -> Self {
        self.attenders_file = attenders.into();
        self.non_attenders_file = non_attenders.into();
        self
    }

    pub fn render(&self, rows: &[AttendanceRow]) -> String {
        let mut csv = String::with_capacity(HEADER.len() + 1 + rows.len() * 48);
        csv.push_str(HEADER);
        csv.push('\n');
        for row in rows {
            let date = row.timestamp.with_timezone(&self.tz).format(TIMESTAMP_FORMAT);
            // writing into a String cannot fail
            let _ = writeln!(csv, "{},{},{}", row.call_index, date, escape_csv(&row.name));
        }
        csv
    }

    /// Writes the attenders report, then the non-attenders report.
    pub async fn write(&self, report: &AttendanceReport) -> Result<ReportPaths, ReportError> {
        let attenders = self.out_dir.join(&self.attenders_file);
        write_file(&attenders, self.render(&report.attended)).await?;
        info!(path = %attenders.display(), rows = report.attended.len(), "wrote attenders report");

        let non_attenders = self.out_dir.join(&self.non_attenders_file);
        write_file(&non_attenders, self.render(&report.missed)).await?;
        info!(path = %non_attenders.display(), rows = report.missed.len(), "wrote non-attenders report");

        Ok(ReportPaths {
            attenders,
            non_attenders,
        })
    }
}

async fn write_file(path: &Path, contents: String) -> Result<(), ReportError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ReportError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
