// Telemetry API HTTP client
//
// Wraps `reqwest::Client` with endpoint construction and envelope
// decoding. Requests always bypass intermediate caches; the caller
// decides whether to reuse an earlier result.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ClientCountRecord, ClientCountResponse, Session};
use crate::transport::TransportConfig;

/// Raw HTTP client for the client-count service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ClientCountClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ClientCountClient {
    /// Create a client from a base URL such as `http://10.0.0.1:5010`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the endpoint for a location/session pair:
    /// `{base}/client-count/{location}/{session}`.
    ///
    /// Pure function of its inputs; the string form doubles as a cache key.
    pub fn endpoint(&self, location: &str, session: Session) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["client-count", location, session.as_str()]);
        }
        url
    }

    /// GET an endpoint and decode its records.
    pub async fn fetch_client_counts(&self, endpoint: &Url) -> Result<Vec<ClientCountRecord>, Error> {
        debug!("GET {}", endpoint);

        let resp = self
            .http
            .get(endpoint.clone())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let decoded = ClientCountResponse::from_body(&body)?;
        trace!(
            status = ?decoded.status,
            records = decoded.records.len(),
            "decoded client-count response"
        );
        Ok(decoded.records)
    }

    /// Resolve and fetch in one step.
    pub async fn client_counts(
        &self,
        location: &str,
        session: Session,
    ) -> Result<Vec<ClientCountRecord>, Error> {
        let endpoint = self.endpoint(location, session);
        self.fetch_client_counts(&endpoint).await
    }
}
