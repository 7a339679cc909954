// ── Core error types ──
//
// User-facing errors from clientcount-core. The `From<clientcount_api::Error>`
// impl translates transport-layer errors into the messages the fetcher
// stores in its state. Cloneable so a failure can live in a watch snapshot.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Cannot reach telemetry service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to telemetry service timed out")]
    Timeout,

    /// Non-2xx response. Display matches the bare `HTTP {status}` message.
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    #[error("Malformed response: {message}")]
    Malformed { message: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Unknown location '{location}' (configured: {available})")]
    UnknownLocation { location: String, available: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clientcount_api::Error> for CoreError {
    fn from(err: clientcount_api::Error) -> Self {
        match err {
            clientcount_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.is_decode() {
                    CoreError::Malformed {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            clientcount_api::Error::Http { status } => CoreError::Api {
                message: format!("HTTP {status}"),
                status: Some(status),
            },
            clientcount_api::Error::Deserialization { message, body: _ } => {
                CoreError::Malformed { message }
            }
            clientcount_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            clientcount_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            clientcount_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_keeps_bare_message() {
        let err = CoreError::from(clientcount_api::Error::Http { status: 404 });
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn deserialization_becomes_malformed() {
        let err = CoreError::from(clientcount_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::Malformed { .. }));
    }
}
