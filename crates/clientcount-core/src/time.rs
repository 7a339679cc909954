//! Timezone-shifted date helpers.
//!
//! The telemetry service reports UTC timestamps; the dashboard labels them
//! in a fixed display offset (UTC+7 by default). The same [`TzOffset`] feeds
//! both the chart labels and custom-range validation so the two cannot
//! drift apart.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed display offset in minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TzOffset(i32);

impl TzOffset {
    /// UTC+7 (WIB).
    pub const WIB: Self = Self(7 * 60);
    pub const UTC: Self = Self(0);

    /// Offsets beyond ±18h are rejected.
    pub fn from_minutes(minutes: i32) -> Result<Self, CoreError> {
        if minutes.abs() > 18 * 60 {
            return Err(CoreError::ValidationFailed {
                message: format!("timezone offset {minutes} minutes is out of range"),
            });
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> i32 {
        self.0
    }

    fn delta(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.0))
    }

    /// Wall-clock time at this offset.
    pub fn shift(self, ts: DateTime<Utc>) -> NaiveDateTime {
        ts.naive_utc() + self.delta()
    }

    /// The UTC instant at which the given wall-clock time occurs.
    pub fn unshift(self, local: NaiveDateTime) -> DateTime<Utc> {
        (local - self.delta()).and_utc()
    }

    /// Calendar date of `now` at this offset.
    pub fn today(self, now: DateTime<Utc>) -> NaiveDate {
        self.shift(now).date()
    }

    /// First instant (00:00:00) of a local day.
    pub fn day_start(self, date: NaiveDate) -> DateTime<Utc> {
        self.unshift(date.and_time(NaiveTime::default()))
    }

    /// Last whole second (23:59:59) of a local day.
    pub fn day_end(self, date: NaiveDate) -> DateTime<Utc> {
        let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        self.unshift(date.and_time(end))
    }
}

impl Default for TzOffset {
    fn default() -> Self {
        Self::WIB
    }
}

impl fmt::Display for TzOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        write!(f, "UTC{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

/// Short month/day label ("Jan 05") for a timestamp shifted by `offset`.
pub fn to_local_date_label(ts: DateTime<Utc>, offset: TzOffset) -> String {
    offset.shift(ts).format("%b %d").to_string()
}

/// Parse an ISO-8601 / RFC 3339 timestamp.
pub fn parse_iso(iso: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::ValidationFailed {
            message: format!("invalid timestamp '{iso}': {e}"),
        })
}

/// [`to_local_date_label`] for a raw ISO string.
pub fn iso_to_local_date_label(iso: &str, offset: TzOffset) -> Result<String, CoreError> {
    parse_iso(iso).map(|ts| to_local_date_label(ts, offset))
}
