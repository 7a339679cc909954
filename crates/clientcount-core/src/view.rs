// ── View composition ──
//
// Binds a filter snapshot to a fetch snapshot: slices the chart series by
// the window selector, keeps only the visible metrics, and carries the
// latest record and status flags through to whatever renders them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fetcher::FetchState;
use crate::filter::FilterState;
use crate::model::{ChartPoint, ClientCountRecord, LocationCatalog, Metric, Session};
use crate::time::TzOffset;

/// Shown in place of the chart when a settled fetch produced nothing.
pub const NO_DATA_MESSAGE: &str = "No data available at this time";

/// Everything a renderer needs for one screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: String,
    pub location: String,
    pub location_label: String,
    pub session: Session,
    pub window_label: String,
    pub visible_metrics: Vec<Metric>,
    pub points: Vec<ChartPoint>,
    pub latest: Option<ClientCountRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardView {
    /// Compose a view. Pure: the same inputs always produce the same view.
    pub fn compose(
        fetch: &FetchState,
        filters: &FilterState,
        catalog: &LocationCatalog,
        offset: TzOffset,
        now: DateTime<Utc>,
    ) -> Self {
        let query = &filters.query;
        let location_label = catalog.label(&query.location);
        Self {
            title: format!(
                "Client Trend \u{2014} {location_label} / {}",
                query.session.label()
            ),
            location: query.location.clone(),
            location_label,
            session: query.session,
            window_label: filters.window.label(offset),
            visible_metrics: filters.metric_visibility.visible().collect(),
            points: filters.window.apply(&fetch.chart_data, now),
            latest: fetch.latest.clone(),
            loading: fetch.loading,
            error: fetch.error_message(),
        }
    }

    /// Nothing to draw and nothing pending.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.points.is_empty()
    }
}
