//! Data-fetching and view-state layer between `clientcount-api` and its
//! consumers.
//!
//! - **[`Fetcher`]**: resolves an endpoint per location/session pair,
//!   answers repeat queries from its [`RequestCache`], and keeps a single
//!   request in flight. A newer fetch supersedes the older one; superseded
//!   results never reach the published [`FetchState`].
//!
//! - **[`FilterModel`]**: the user's selections (location, session, metric
//!   visibility, display window) on a `tokio::sync::watch` channel.
//!   [`Fetcher::follow`] refetches whenever the [`Query`] part changes.
//!
//! - **Windowing** ([`window`]): count and date windows applied to the
//!   sorted chart series as a pure slice.
//!
//! - **Time and number utilities** ([`time`], [`format`]): timezone-shifted
//!   date labels, custom-range day boundaries, and grouped number output.
//!
//! - **[`DashboardView`]**: composes a fetch snapshot and a filter snapshot
//!   into what a renderer draws.

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod format;
pub mod model;
pub mod time;
pub mod view;
pub mod window;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{Records, RequestCache};
pub use error::CoreError;
pub use fetcher::{FetchOptions, FetchOutcome, FetchState, Fetcher};
pub use filter::{FilterModel, FilterState, Query, QueryChange};
pub use format::format_number;
pub use time::{TzOffset, iso_to_local_date_label, to_local_date_label};
pub use view::{DashboardView, NO_DATA_MESSAGE};
pub use window::{CountWindow, DatePreset, DateRange, DateWindow, WindowSelector};

pub use model::{
    ChartPoint, ClientCountRecord, LocationCatalog, Metric, MetricVisibility, Session, chart_data,
    latest,
};

// API types consumers need to build a fetcher.
pub use clientcount_api::{ClientCountClient, TlsMode, TransportConfig};
