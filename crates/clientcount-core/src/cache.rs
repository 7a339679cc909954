// ── Request cache ──
//
// Endpoint string -> last successfully fetched record set. Written only by
// settled, non-superseded fetches. Clones share storage, so a cache can be
// handed to several fetchers explicitly or kept private to one.

use std::sync::Arc;

use dashmap::DashMap;

use crate::model::ClientCountRecord;

/// Shared record set as held by the cache and the fetcher state.
pub type Records = Arc<Vec<ClientCountRecord>>;

#[derive(Debug, Clone, Default)]
pub struct RequestCache {
    entries: Arc<DashMap<String, Records>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: &str) -> Option<Records> {
        self.entries.get(endpoint).map(|r| Arc::clone(r.value()))
    }

    pub fn insert(&self, endpoint: impl Into<String>, records: Records) {
        self.entries.insert(endpoint.into(), records);
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.entries.contains_key(endpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
