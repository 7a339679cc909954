// ── Remote data fetcher ──
//
// Resolves an endpoint for a location/session pair, serves repeat queries
// from the request cache, and keeps at most one request in flight. A newer
// fetch always supersedes an older one: the older request's transfer is
// cancelled and whatever it produces is discarded.
//
// Supersession is tracked by a generation counter. The counter is the
// authority on whether a result may land; the cancellation token only
// stops the transfer early. Every state write happens under the same lock
// that guards the counter, so a stale completion can never interleave with
// a newer fetch's writes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use clientcount_api::ClientCountClient;

use crate::cache::{Records, RequestCache};
use crate::error::CoreError;
use crate::filter::{FilterState, Query};
use crate::model::{ChartPoint, ClientCountRecord, chart_data, latest};
use crate::time::TzOffset;

// ── State ────────────────────────────────────────────────────────

/// Everything a view needs from the fetcher. Published on a `watch`
/// channel after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    /// The most recently requested query.
    pub query: Option<Query>,
    /// Endpoint the held records came from.
    pub endpoint: Option<String>,
    pub records: Records,
    /// `records` sorted ascending and mapped to chart points.
    pub chart_data: Arc<Vec<ChartPoint>>,
    pub latest: Option<ClientCountRecord>,
    pub loading: bool,
    pub error: Option<CoreError>,
}

impl FetchState {
    fn empty() -> Self {
        Self {
            query: None,
            endpoint: None,
            records: Arc::new(Vec::new()),
            chart_data: Arc::new(Vec::new()),
            latest: None,
            loading: false,
            error: None,
        }
    }

    /// Replace the held records and recompute everything derived from them.
    fn set_records(&mut self, endpoint: String, records: Records, offset: TzOffset) {
        self.chart_data = Arc::new(chart_data(&records, offset));
        self.latest = latest(&records).cloned();
        self.records = records;
        self.endpoint = Some(endpoint);
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Per-call fetch options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache read. A successful result still updates the cache.
    pub force_refresh: bool,
}

impl FetchOptions {
    pub const FORCE: Self = Self {
        force_refresh: true,
    };
}

/// How a fetch call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from the cache without network I/O.
    CacheHit { records: usize },
    /// Fetched, cached, and published.
    Loaded { records: usize },
    /// The request failed; the error is also in the published state.
    Failed(CoreError),
    /// A newer fetch or a teardown took over; nothing was published.
    Superseded,
}

// ── Fetcher ──────────────────────────────────────────────────────

/// Remote data fetcher for one view.
///
/// Cheaply cloneable via `Arc`; clones share the in-flight slot, the cache,
/// and the published state.
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    client: ClientCountClient,
    cache: RequestCache,
    offset: TzOffset,
    state: watch::Sender<FetchState>,
    in_flight: Mutex<InFlight>,
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    cancel: Option<CancellationToken>,
}

/// A request that has been started but not awaited.
struct Pending {
    generation: u64,
    token: CancellationToken,
    endpoint: Url,
    key: String,
}

enum Start {
    Done(FetchOutcome),
    Pending(Pending),
}

impl Fetcher {
    /// Create a fetcher with its own private cache.
    pub fn new(client: ClientCountClient, offset: TzOffset) -> Self {
        Self::with_cache(client, RequestCache::new(), offset)
    }

    /// Create a fetcher over an explicitly provided cache.
    pub fn with_cache(client: ClientCountClient, cache: RequestCache, offset: TzOffset) -> Self {
        let (state, _) = watch::channel(FetchState::empty());
        Self {
            inner: Arc::new(FetcherInner {
                client,
                cache,
                offset,
                state,
                in_flight: Mutex::new(InFlight::default()),
            }),
        }
    }

    pub fn client(&self) -> &ClientCountClient {
        &self.inner.client
    }

    pub fn cache(&self) -> &RequestCache {
        &self.inner.cache
    }

    pub fn offset(&self) -> TzOffset {
        self.inner.offset
    }

    /// Endpoint for a query. Pure.
    pub fn endpoint(&self, query: &Query) -> Url {
        self.inner.client.endpoint(&query.location, query.session)
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    // ── Fetch lifecycle ──────────────────────────────────────────

    /// Fetch records for `query`, superseding any request in flight.
    ///
    /// Never returns an error: failures are published in the state and
    /// reported as [`FetchOutcome::Failed`].
    pub async fn fetch(&self, query: &Query, options: FetchOptions) -> FetchOutcome {
        match self.start(query, options) {
            Start::Done(outcome) => outcome,
            Start::Pending(pending) => self.complete(pending).await,
        }
    }

    /// Start a fetch and drive it on a background task.
    ///
    /// The cache check and supersession happen before this returns, so
    /// successive calls keep their call order.
    pub fn spawn(&self, query: &Query, options: FetchOptions) -> JoinHandle<FetchOutcome> {
        match self.start(query, options) {
            Start::Done(outcome) => tokio::spawn(async move { outcome }),
            Start::Pending(pending) => {
                let this = self.clone();
                tokio::spawn(async move { this.complete(pending).await })
            }
        }
    }

    /// Forced refetch of the last requested query. `None` if nothing has
    /// been requested yet.
    pub async fn refresh(&self) -> Option<FetchOutcome> {
        let query = self.inner.state.borrow().query.clone()?;
        Some(self.fetch(&query, FetchOptions::FORCE).await)
    }

    /// Abort the request in flight, if any, without touching state.
    pub fn cancel(&self) {
        let mut in_flight = self.lock();
        in_flight.generation += 1;
        if let Some(token) = in_flight.cancel.take() {
            debug!("cancelling in-flight request");
            token.cancel();
        }
    }

    /// Follow a filter model: fetch on every location/session change until
    /// `cancel` fires or the filter model goes away, then tear down.
    pub async fn follow(&self, mut filters: watch::Receiver<FilterState>, cancel: CancellationToken) {
        let mut current = filters.borrow_and_update().query.clone();
        drop(self.spawn(&current, FetchOptions::default()));

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                changed = filters.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let next = filters.borrow_and_update().query.clone();
                    if next != current {
                        current = next;
                        drop(self.spawn(&current, FetchOptions::default()));
                    }
                }
            }
        }

        self.cancel();
        debug!("fetcher detached");
    }

    // ── Internals ────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Synchronous half of a fetch: supersede the previous request, then
    /// either answer from the cache or register a new pending request.
    fn start(&self, query: &Query, options: FetchOptions) -> Start {
        let endpoint = self.endpoint(query);
        let key = endpoint.to_string();

        let mut in_flight = self.lock();
        in_flight.generation += 1;
        if let Some(previous) = in_flight.cancel.take() {
            debug!(endpoint = %key, "superseding in-flight request");
            previous.cancel();
        }

        if !options.force_refresh {
            if let Some(records) = self.inner.cache.get(&key) {
                debug!(endpoint = %key, records = records.len(), "cache hit");
                let count = records.len();
                let offset = self.inner.offset;
                self.inner.state.send_modify(|state| {
                    state.query = Some(query.clone());
                    state.set_records(key, records, offset);
                    state.loading = false;
                    state.error = None;
                });
                return Start::Done(FetchOutcome::CacheHit { records: count });
            }
        }

        let token = CancellationToken::new();
        in_flight.cancel = Some(token.clone());
        let generation = in_flight.generation;

        self.inner.state.send_modify(|state| {
            state.query = Some(query.clone());
            state.loading = true;
            state.error = None;
        });

        Start::Pending(Pending {
            generation,
            token,
            endpoint,
            key,
        })
    }

    /// Asynchronous half: await the transfer and publish the result if
    /// this request is still the current one.
    async fn complete(&self, pending: Pending) -> FetchOutcome {
        let Pending {
            generation,
            token,
            endpoint,
            key,
        } = pending;

        let result = tokio::select! {
            biased;

            () = token.cancelled() => None,
            result = self.inner.client.fetch_client_counts(&endpoint) => Some(result),
        };

        let Some(result) = result else {
            debug!(endpoint = %key, "request cancelled");
            return FetchOutcome::Superseded;
        };

        let mut in_flight = self.lock();
        if in_flight.generation != generation {
            debug!(endpoint = %key, "discarding superseded response");
            return FetchOutcome::Superseded;
        }
        in_flight.cancel = None;

        match result {
            Ok(records) => {
                let records: Records = Arc::new(records);
                let count = records.len();
                debug!(endpoint = %key, records = count, "fetched client counts");
                self.inner.cache.insert(key.clone(), Arc::clone(&records));
                let offset = self.inner.offset;
                self.inner.state.send_modify(|state| {
                    state.set_records(key, records, offset);
                    state.loading = false;
                });
                FetchOutcome::Loaded { records: count }
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(endpoint = %key, error = %err, "client-count fetch failed");
                self.inner.state.send_modify(|state| {
                    state.error = Some(err.clone());
                    state.loading = false;
                });
                FetchOutcome::Failed(err)
            }
        }
    }
}
