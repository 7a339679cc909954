//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use clientcount_core::model::record_value;
use clientcount_core::{
    ClientCountRecord, CoreError, DateRange, FetchOptions, FetchOutcome, FetchState, Fetcher,
    MetricVisibility, Query, Session, TzOffset, WindowSelector, format_number,
};

use crate::cli::{CountsArgs, GlobalOpts, QueryArgs, SessionArg};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

impl From<SessionArg> for Session {
    fn from(arg: SessionArg) -> Self {
        match arg {
            SessionArg::Pagi => Session::Morning,
            SessionArg::Siang => Session::Afternoon,
        }
    }
}

/// Location and session from flags, falling back to the configured
/// defaults. The location must be in the catalog.
pub fn resolve_query(settings: &Settings, args: &QueryArgs) -> Result<Query, CliError> {
    let location = args
        .location
        .clone()
        .unwrap_or_else(|| settings.default_query.location.clone());
    settings.catalog.validate(&location)?;
    let session = args
        .session
        .map_or(settings.default_query.session, Session::from);
    Ok(Query::new(location, session))
}

/// Window selector from `--window`, or from `--from/--to` when given.
pub fn window_selector(
    args: &CountsArgs,
    offset: TzOffset,
    now: DateTime<Utc>,
) -> Result<WindowSelector, CliError> {
    match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let from = parse_date("from", from)?;
            let to = parse_date("to", to)?;
            let range = DateRange::from_local_dates(from, to, offset, now)?;
            Ok(WindowSelector::Date(range))
        }
        _ => Ok(args.window.parse()?),
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}': {e}"),
    })
}

/// Fetch one query, with a spinner on an interactive terminal. A failed
/// fetch becomes the command's error.
pub async fn fetch(
    fetcher: &Fetcher,
    query: &Query,
    options: FetchOptions,
    global: &GlobalOpts,
) -> Result<FetchState, CliError> {
    let pb = spinner(
        global,
        format!("Fetching {} / {}", query.location, query.session.label()),
    );
    let outcome = fetcher.fetch(query, options).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match outcome {
        FetchOutcome::CacheHit { .. } | FetchOutcome::Loaded { .. } => Ok(fetcher.snapshot()),
        FetchOutcome::Failed(err) => Err(err.into()),
        FetchOutcome::Superseded => {
            Err(CoreError::Internal("request was cancelled before it settled".into()).into())
        }
    }
}

fn spinner(global: &GlobalOpts, message: String) -> Option<ProgressBar> {
    if global.quiet || !io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

// ── KPI rendering ───────────────────────────────────────────────────

/// One line per metric with the grouped count, for the KPI panel.
pub fn kpi_lines(record: &ClientCountRecord, locale: &str, color: bool) -> String {
    MetricVisibility::all()
        .visible()
        .map(|metric| {
            let label = format!("{:<9}", format!("{}:", metric.label()));
            format!(
                "{} {}",
                output::muted(&label, color),
                format_number(record_value(record, metric), locale)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compact single-line KPI summary.
pub fn kpi_inline(record: &ClientCountRecord, locale: &str) -> String {
    MetricVisibility::all()
        .visible()
        .map(|metric| {
            format!(
                "{} {}",
                metric.label(),
                format_number(record_value(record, metric), locale)
            )
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Sample time in the display offset, e.g. `2024-01-01 07:00 (UTC+07:00)`.
pub fn local_timestamp(ts: DateTime<Utc>, offset: TzOffset) -> String {
    format!("{} ({offset})", offset.shift(ts).format("%Y-%m-%d %H:%M"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record() -> ClientCountRecord {
        ClientCountRecord {
            id: "1".into(),
            location: "gatsu".into(),
            session: "pagi".into(),
            dhcp: 1234,
            dynamic: 56,
            hotspot: 7890,
            guest: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn inline_kpis_are_grouped() {
        assert_eq!(
            kpi_inline(&record(), "en-US"),
            "DHCP 1,234  Dynamic 56  Hotspot 7,890  Guest 0"
        );
    }

    #[test]
    fn kpi_lines_cover_every_metric() {
        let out = kpi_lines(&record(), "id-ID", false);
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("1.234"));
    }

    #[test]
    fn local_timestamp_applies_offset() {
        assert_eq!(
            local_timestamp(record().created_at, TzOffset::WIB),
            "2024-01-01 07:00 (UTC+07:00)"
        );
    }

    #[test]
    fn session_arg_maps_to_session() {
        assert_eq!(Session::from(SessionArg::Siang), Session::Afternoon);
    }
}
