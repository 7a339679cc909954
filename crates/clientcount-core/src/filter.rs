// ── Filter state model ──
//
// Holds what the user has selected: the location/session pair that drives
// fetching, plus metric visibility and the display window which only
// affect how fetched data is shown.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{LocationCatalog, MetricVisibility, Session};
use crate::window::WindowSelector;

/// The fetcher's input: which endpoint to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    pub location: String,
    pub session: Session,
}

impl Query {
    pub fn new(location: impl Into<String>, session: Session) -> Self {
        Self {
            location: location.into(),
            session,
        }
    }
}

/// Current selections. Lives as long as the view that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub query: Query,
    pub metric_visibility: MetricVisibility,
    pub window: WindowSelector,
}

/// Partial location/session update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryChange {
    pub location: Option<String>,
    pub session: Option<Session>,
}

/// Observable owner of [`FilterState`].
///
/// Every setter publishes the new state on a `watch` channel; the fetcher
/// subscribes and refetches only when the [`Query`] part changes.
pub struct FilterModel {
    catalog: Arc<LocationCatalog>,
    state: watch::Sender<FilterState>,
}

impl FilterModel {
    /// Start from the first configured location, the morning session,
    /// all metrics, and the default window.
    pub fn new(catalog: Arc<LocationCatalog>) -> Self {
        let initial = FilterState {
            query: Query::new(catalog.first(), Session::Morning),
            metric_visibility: MetricVisibility::all(),
            window: WindowSelector::default(),
        };
        let (state, _) = watch::channel(initial);
        Self { catalog, state }
    }

    /// Start from an explicit state. The location must be in the catalog.
    pub fn with_state(catalog: Arc<LocationCatalog>, initial: FilterState) -> Result<Self, CoreError> {
        catalog.validate(&initial.query.location)?;
        let (state, _) = watch::channel(initial);
        Ok(Self { catalog, state })
    }

    pub fn catalog(&self) -> &Arc<LocationCatalog> {
        &self.catalog
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> FilterState {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> Query {
        self.state.borrow().query.clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }

    /// Update location and/or session in one step. Returns whether the
    /// query actually changed (and so whether a refetch follows).
    pub fn set_location_and_session(&self, change: QueryChange) -> Result<bool, CoreError> {
        if let Some(ref location) = change.location {
            self.catalog.validate(location)?;
        }
        let changed = self.state.send_if_modified(|state| {
            let mut next = state.query.clone();
            if let Some(location) = change.location {
                next.location = location;
            }
            if let Some(session) = change.session {
                next.session = session;
            }
            if next == state.query {
                return false;
            }
            state.query = next;
            true
        });
        if changed {
            debug!(query = ?self.state.borrow().query, "query changed");
        }
        Ok(changed)
    }

    /// Replace the visibility map wholesale.
    pub fn set_metric_visibility(&self, visibility: MetricVisibility) {
        self.state.send_if_modified(|state| {
            let changed = state.metric_visibility != visibility;
            state.metric_visibility = visibility;
            changed
        });
    }

    /// Replace the display window. Never affects the query.
    pub fn set_window_selector(&self, window: WindowSelector) {
        self.state.send_if_modified(|state| {
            let changed = state.window != window;
            state.window = window;
            changed
        });
    }
}
