//! Display windows: client-side slices of an already-fetched series.
//!
//! Two schemes exist, by item count or by date. A [`WindowSelector`] holds
//! exactly one of them; changing it never triggers a refetch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::ChartPoint;
use crate::time::TzOffset;

/// Upper bound for a custom item count.
pub const MAX_CUSTOM_COUNT: u32 = 1000;

// ── Count window ────────────────────────────────────────────────────

/// Keep the last N points, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountWindow {
    Last(u32),
    All,
}

impl CountWindow {
    /// A custom count, bounded to `1..=1000`.
    pub fn last(n: u32) -> Result<Self, CoreError> {
        if (1..=MAX_CUSTOM_COUNT).contains(&n) {
            Ok(Self::Last(n))
        } else {
            Err(CoreError::ValidationFailed {
                message: format!("item count must be between 1 and {MAX_CUSTOM_COUNT}, got {n}"),
            })
        }
    }

    pub fn apply<'a>(&self, points: &'a [ChartPoint]) -> &'a [ChartPoint] {
        match self {
            Self::All => points,
            Self::Last(n) => {
                let n = usize::try_from(*n).unwrap_or(usize::MAX);
                &points[points.len().saturating_sub(n)..]
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All".into(),
            Self::Last(n) => format!("{n} items"),
        }
    }
}

// ── Date window ─────────────────────────────────────────────────────

/// Named look-back periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatePreset {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
}

impl DatePreset {
    pub const ALL: [Self; 3] = [Self::SevenDays, Self::OneMonth, Self::ThreeMonths];

    pub fn days(self) -> i64 {
        match self {
            Self::SevenDays => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::SevenDays => "7d",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "7 days",
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
        }
    }

    /// Epoch-ms cutoff: `now` minus the period.
    pub fn cutoff(self, now: DateTime<Utc>) -> i64 {
        (now - TimeDelta::days(self.days())).timestamp_millis()
    }
}

/// Keep points inside a date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    Preset(DatePreset),
    /// Inclusive epoch-ms bounds.
    Range { from: i64, to: i64 },
}

impl DateWindow {
    pub fn contains(&self, timestamp: i64, now: DateTime<Utc>) -> bool {
        match self {
            Self::Preset(preset) => timestamp >= preset.cutoff(now),
            Self::Range { from, to } => (*from..=*to).contains(&timestamp),
        }
    }

    pub fn label(&self, offset: TzOffset) -> String {
        match self {
            Self::Preset(preset) => preset.label().into(),
            Self::Range { from, to } => {
                format!("{} - {}", local_date(*from, offset), local_date(*to, offset))
            }
        }
    }
}

fn local_date(ms: i64, offset: TzOffset) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |ts| offset.shift(ts).format("%-m/%-d/%Y").to_string(),
    )
}

/// Custom date range picked as calendar days in the display offset.
pub struct DateRange;

impl DateRange {
    /// Validate a `from..=to` pick and turn it into epoch-ms bounds:
    /// local 00:00:00 of `from` through local 23:59:59 of `to`.
    ///
    /// "Today" is `now` shifted by the same offset the chart labels use.
    pub fn from_local_dates(
        from: NaiveDate,
        to: NaiveDate,
        offset: TzOffset,
        now: DateTime<Utc>,
    ) -> Result<DateWindow, CoreError> {
        let today = offset.today(now);
        if from > today {
            return Err(invalid("Start date cannot be after today"));
        }
        if to > today {
            return Err(invalid("End date cannot be after today"));
        }
        if from > to {
            return Err(invalid("Start date cannot be after end date"));
        }
        Ok(DateWindow::Range {
            from: offset.day_start(from).timestamp_millis(),
            to: offset.day_end(to).timestamp_millis(),
        })
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::ValidationFailed {
        message: message.into(),
    }
}

// ── Selector ────────────────────────────────────────────────────────

/// The active display window. Exactly one scheme at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSelector {
    Count(CountWindow),
    Date(DateWindow),
}

impl WindowSelector {
    /// Apply to a chart series (sorted ascending). Pure; `now` only
    /// matters for date presets.
    pub fn apply(&self, points: &[ChartPoint], now: DateTime<Utc>) -> Vec<ChartPoint> {
        match self {
            Self::Count(window) => window.apply(points).to_vec(),
            Self::Date(window) => points
                .iter()
                .filter(|p| window.contains(p.timestamp, now))
                .cloned()
                .collect(),
        }
    }

    pub fn label(&self, offset: TzOffset) -> String {
        match self {
            Self::Count(window) => window.label(),
            Self::Date(window) => window.label(offset),
        }
    }
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self::Count(CountWindow::Last(10))
    }
}

impl fmt::Display for WindowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(TzOffset::default()))
    }
}

impl FromStr for WindowSelector {
    type Err = CoreError;

    /// Parse `10`, `20`, `30`, `all`, a custom count, `7d`, `1m`, or `3m`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "all" {
            return Ok(Self::Count(CountWindow::All));
        }
        if let Some(preset) = DatePreset::ALL.into_iter().find(|p| p.key() == s) {
            return Ok(Self::Date(DateWindow::Preset(preset)));
        }
        match s.parse::<u32>() {
            Ok(n) => CountWindow::last(n).map(Self::Count),
            Err(_) => Err(CoreError::ValidationFailed {
                message: format!(
                    "unknown window '{s}' (expected 10, 20, 30, all, a count, 7d, 1m, or 3m)"
                ),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DAY_MS: i64 = 86_400_000;

    fn point(timestamp: i64, n: u64) -> ChartPoint {
        ChartPoint {
            timestamp,
            date_label: String::new(),
            dhcp: n,
            dynamic: n,
            hotspot: n,
            guest: n,
        }
    }

    fn series(len: u64) -> Vec<ChartPoint> {
        (0..len)
            .map(|i| point(i64::try_from(i).unwrap() * 1000, i))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        "2024-04-10T05:00:00Z".parse().unwrap()
    }

    #[test]
    fn count_keeps_last_n_in_order() {
        let points = series(50);
        let windowed = WindowSelector::Count(CountWindow::Last(10)).apply(&points, now());
        assert_eq!(windowed, points[40..].to_vec());
    }

    #[test]
    fn count_larger_than_series_keeps_all() {
        let points = series(5);
        let windowed = WindowSelector::Count(CountWindow::Last(30)).apply(&points, now());
        assert_eq!(windowed.len(), 5);
        let all = WindowSelector::Count(CountWindow::All).apply(&points, now());
        assert_eq!(all, points);
    }

    #[test]
    fn custom_count_is_bounded() {
        assert!(CountWindow::last(0).is_err());
        assert!(CountWindow::last(1001).is_err());
        assert_eq!(CountWindow::last(1000).unwrap(), CountWindow::Last(1000));
    }

    #[test]
    fn date_preset_boundary_is_inclusive() {
        let now_ms = now().timestamp_millis();
        let points: Vec<ChartPoint> = (0..100)
            .rev()
            .map(|d| point(now_ms - d * DAY_MS, 0))
            .collect();
        let windowed =
            WindowSelector::Date(DateWindow::Preset(DatePreset::SevenDays)).apply(&points, now());
        let cutoff = now_ms - 7 * DAY_MS;
        assert_eq!(windowed.len(), 8);
        assert_eq!(windowed[0].timestamp, cutoff);
        assert!(windowed.iter().all(|p| p.timestamp >= cutoff));
    }

    #[test]
    fn explicit_range_includes_end() {
        let from = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        let window = DateRange::from_local_dates(from, to, TzOffset::WIB, now()).unwrap();
        let DateWindow::Range { from: lo, to: hi } = window else {
            panic!("expected range");
        };
        let points = vec![point(lo - 1, 0), point(lo, 1), point(hi, 2), point(hi + 1, 3)];
        let windowed = WindowSelector::Date(window).apply(&points, now());
        let kept: Vec<u64> = windowed.iter().map(|p| p.dhcp).collect();
        assert_eq!(kept, vec![1, 2]);
    }

    #[test]
    fn range_validation() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
        // 05:00 UTC is already noon on the 10th in UTC+7; the 11th is the future.
        assert!(DateRange::from_local_dates(day(5), day(10), TzOffset::WIB, now()).is_ok());
        assert!(DateRange::from_local_dates(day(5), day(11), TzOffset::WIB, now()).is_err());
        assert!(DateRange::from_local_dates(day(8), day(5), TzOffset::WIB, now()).is_err());
        assert!(DateRange::from_local_dates(day(11), day(11), TzOffset::WIB, now()).is_err());
    }

    #[test]
    fn today_follows_offset() {
        // 20:00 UTC on the 10th is the 11th in UTC+7 but not in UTC.
        let late: DateTime<Utc> = "2024-04-10T20:00:00Z".parse().unwrap();
        let day11 = NaiveDate::from_ymd_opt(2024, 4, 11).unwrap();
        assert!(DateRange::from_local_dates(day11, day11, TzOffset::WIB, late).is_ok());
        assert!(DateRange::from_local_dates(day11, day11, TzOffset::UTC, late).is_err());
    }

    #[test]
    fn parses_selectors() {
        assert_eq!(
            "20".parse::<WindowSelector>().unwrap(),
            WindowSelector::Count(CountWindow::Last(20))
        );
        assert_eq!(
            "ALL".parse::<WindowSelector>().unwrap(),
            WindowSelector::Count(CountWindow::All)
        );
        assert_eq!(
            "3m".parse::<WindowSelector>().unwrap(),
            WindowSelector::Date(DateWindow::Preset(DatePreset::ThreeMonths))
        );
        assert!("0".parse::<WindowSelector>().is_err());
        assert!("week".parse::<WindowSelector>().is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(WindowSelector::default().to_string(), "10 items");
        assert_eq!(
            WindowSelector::Date(DateWindow::Preset(DatePreset::OneMonth)).to_string(),
            "1 month"
        );
        let range = DateWindow::Range {
            from: TzOffset::WIB
                .day_start(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
                .timestamp_millis(),
            to: TzOffset::WIB
                .day_end(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap())
                .timestamp_millis(),
        };
        assert_eq!(range.label(TzOffset::WIB), "4/1/2024 - 4/3/2024");
    }
}
