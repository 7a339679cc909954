use thiserror::Error;

/// Top-level error type for the `clientcount-api` crate.
///
/// Covers every failure mode of a single telemetry request: transport,
/// HTTP status, and response decoding. `clientcount-core` maps these into
/// the messages surfaced to the user.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Non-2xx response from the telemetry service.
    #[error("HTTP {status}")]
    Http { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status() {
        let err = Error::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn decode_errors_carry_no_status() {
        let err = Error::Deserialization {
            message: "eof".into(),
            body: String::new(),
        };
        assert_eq!(err.status(), None);
    }
}
