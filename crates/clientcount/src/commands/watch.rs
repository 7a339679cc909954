//! `watch`: refetch one location and session on an interval.
//!
//! Every cycle after the first is a forced refresh. Failures are printed
//! and the loop keeps going; Ctrl-C or `--count` ends it. Ctrl-C also
//! aborts a fetch that is still in flight.

use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use clientcount_core::{FetchOptions, FetchOutcome, FetchState, NO_DATA_MESSAGE, Query};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

use super::latest::LatestSummary;
use super::util;

pub async fn handle(
    settings: &Settings,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = parse_interval(&args.interval)?;
    let query = util::resolve_query(settings, &args.query)?;
    let fetcher = config::build_fetcher(settings)?;

    tracing::info!(
        location = %query.location,
        session = %query.session,
        interval = %humantime::format_duration(interval),
        "watching"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut cycles: u32 = 0;

    // One listener for the whole run, so a Ctrl-C during a fetch is not lost.
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                tracing::debug!("interrupted while idle");
                break;
            }
            _ = ticker.tick() => {}
        }

        let cycle = async {
            if cycles == 0 {
                fetcher.fetch(&query, FetchOptions::default()).await
            } else {
                fetcher
                    .refresh()
                    .await
                    .unwrap_or(FetchOutcome::Superseded)
            }
        };
        let outcome = tokio::select! {
            _ = &mut interrupt => {
                tracing::debug!("interrupted during fetch");
                break;
            }
            outcome = cycle => outcome,
        };
        report(settings, &query, &outcome, &fetcher.snapshot(), global);

        cycles += 1;
        if args.count.is_some_and(|n| cycles >= n) {
            break;
        }
    }

    fetcher.cancel();
    Ok(())
}

fn parse_interval(raw: &str) -> Result<Duration, CliError> {
    let interval = humantime::parse_duration(raw).map_err(|e| CliError::Validation {
        field: "interval".into(),
        reason: format!("'{raw}': {e}"),
    })?;
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(interval)
}

fn report(
    settings: &Settings,
    query: &Query,
    outcome: &FetchOutcome,
    state: &FetchState,
    global: &GlobalOpts,
) {
    if let FetchOutcome::Failed(err) = outcome {
        tracing::warn!(error = %err, "refresh failed");
        eprintln!("{}  error: {err}", stamp(settings));
        return;
    }

    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let summary = LatestSummary::new(settings, query, state.latest.clone());
            output::render_json(&summary, true)
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let counts = state.latest.as_ref().map_or_else(
                || NO_DATA_MESSAGE.to_owned(),
                |r| util::kpi_inline(r, &settings.locale),
            );
            format!(
                "{}  {} / {}  {counts}",
                stamp(settings),
                settings.catalog.label(&query.location),
                query.session.label()
            )
        }
    };
    output::print_output(&line, global.quiet);
}

fn stamp(settings: &Settings) -> String {
    settings.offset.shift(Utc::now()).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_accepts_humantime() {
        assert!(matches!(parse_interval("1m 30s"), Ok(d) if d == Duration::from_secs(90)));
        assert!(parse_interval("0s").is_err());
        assert!(parse_interval("soon").is_err());
    }
}
