// ── Domain model ──
//
// Wire records come from `clientcount-api`; everything here is derived
// from them or describes what the user has selected.

pub mod chart;
pub mod location;
pub mod metric;

pub use chart::{ChartPoint, chart_data, latest, record_value};
pub use clientcount_api::{ClientCountRecord, Session};
pub use location::LocationCatalog;
pub use metric::{Metric, MetricVisibility};
