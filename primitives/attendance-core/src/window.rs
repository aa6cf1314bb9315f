//! Optional start/end date bounds given as `YYYY/MM/DD`.

use crate::error::DateWindowError;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::warn;

const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    /// Start of the day after `end`.
    until: DateTime<Utc>,
}

/// Date bounds for the report. Unbounded unless both dates were supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    bounds: Option<Bounds>,
}

impl DateWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parses the bounds as local calendar days.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DateWindowError> {
        Self::parse_in(&Local, start, end)
    }

    /// Parses the bounds as calendar days in `tz`.
    ///
    /// A malformed date is rejected even when its counterpart is missing; a
    /// lone date leaves the window unbounded.
    pub fn parse_in<Tz: TimeZone>(
        tz: &Tz,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, DateWindowError> {
        let start_day = start.map(parse_day).transpose()?;
        let end_day = end.map(parse_day).transpose()?;

        let (start_day, end_day) = match (start_day, end_day) {
            (Some(s), Some(e)) => (s, e),
            (None, None) => return Ok(Self::unbounded()),
            _ => {
                warn!("only one of start date and end date given, reporting without a date window");
                return Ok(Self::unbounded());
            }
        };

        if start_day > end_day {
            return Err(DateWindowError::Reversed {
                start: start_day.format(DATE_FORMAT).to_string(),
                end: end_day.format(DATE_FORMAT).to_string(),
            });
        }

        let next_day = end_day.succ_opt().unwrap_or(NaiveDate::MAX);
        Ok(Self {
            bounds: Some(Bounds {
                start: day_start(tz, start_day),
                end: day_start(tz, end_day),
                until: day_start(tz, next_day),
            }),
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.bounds.map(|b| b.start)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.bounds.map(|b| b.end)
    }

    /// True when `instant` falls on or after the start day and no later than the end day.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match self.bounds {
            Some(b) => b.start <= instant && instant < b.until,
            None => true,
        }
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, DateWindowError> {
    let invalid = || DateWindowError::InvalidDateFormat {
        value: raw.to_string(),
    };

    // chrono alone accepts unpadded fields such as 2024/1/5
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

fn day_start<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        // midnight skipped by a DST transition
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
        .with_timezone(&Utc)
}
