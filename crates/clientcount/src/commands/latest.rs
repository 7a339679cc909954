//! `latest`: KPI tiles for the most recent sample.

use serde::Serialize;

use clientcount_core::{ClientCountRecord, FetchOptions, NO_DATA_MESSAGE, Query, Session};

use crate::cli::{GlobalOpts, QueryArgs};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

use super::util;

/// What `latest` prints in structured formats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSummary {
    pub location: String,
    pub location_label: String,
    pub session: Session,
    pub latest: Option<ClientCountRecord>,
}

impl LatestSummary {
    pub fn new(settings: &Settings, query: &Query, latest: Option<ClientCountRecord>) -> Self {
        Self {
            location_label: settings.catalog.label(&query.location),
            location: query.location.clone(),
            session: query.session,
            latest,
        }
    }
}

pub async fn handle(
    settings: &Settings,
    args: QueryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = util::resolve_query(settings, &args)?;
    let fetcher = config::build_fetcher(settings)?;
    let state = util::fetch(&fetcher, &query, FetchOptions::default(), global).await?;

    let summary = LatestSummary::new(settings, &query, state.latest);
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, settings, color),
        plain,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(summary: &LatestSummary, settings: &Settings, color: bool) -> String {
    let heading = output::heading(
        &format!("{} / {}", summary.location_label, summary.session.label()),
        color,
    );
    match summary.latest {
        Some(ref record) => format!(
            "{heading}\n{}\n{}",
            output::muted(
                &util::local_timestamp(record.created_at, settings.offset),
                color
            ),
            util::kpi_lines(record, &settings.locale, color)
        ),
        None => format!("{heading}\n{NO_DATA_MESSAGE}"),
    }
}

/// Tab-separated raw counts: dhcp, dynamic, hotspot, guest.
fn plain(summary: &LatestSummary) -> String {
    summary.latest.as_ref().map_or_else(
        || NO_DATA_MESSAGE.into(),
        |r| format!("{}\t{}\t{}\t{}", r.dhcp, r.dynamic, r.hotspot, r.guest),
    )
}
