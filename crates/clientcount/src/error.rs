//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use clientcount_config::ConfigError;
use clientcount_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the telemetry service at {url}")]
    #[diagnostic(
        code(clientcount::connection_failed),
        help(
            "Check that the service is running and reachable.\n\
             Reason: {reason}\n\
             Override the target with --api-url and --api-port."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the telemetry service timed out")]
    #[diagnostic(
        code(clientcount::timeout),
        help("Increase the timeout with --timeout or set timeout_secs in the config file.")
    )]
    Timeout,

    // ── Service responses ────────────────────────────────────────────
    #[error("Telemetry service error: {message}")]
    #[diagnostic(code(clientcount::api_error), help("Retry the command to refresh."))]
    Api { message: String },

    #[error("Malformed response from the telemetry service")]
    #[diagnostic(code(clientcount::malformed), help("{message}"))]
    Malformed { message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Location '{location}' is not configured")]
    #[diagnostic(
        code(clientcount::unknown_location),
        help(
            "Configured locations: {available}\n\
             Run: clientcount locations"
        )
    )]
    UnknownLocation { location: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clientcount::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing required setting '{key}'")]
    #[diagnostic(
        code(clientcount::missing_config),
        help(
            "Set {key} in {path}, or export {env} (or {legacy}).\n\
             Create a config file with: clientcount config init"
        )
    )]
    MissingConfig {
        key: String,
        env: String,
        legacy: String,
        path: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(clientcount::config))]
    Config { message: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(clientcount::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::UnknownLocation { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::MissingConfig { .. }
            | Self::Config { .. }
            | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Api { .. } | Self::Malformed { .. } | Self::Io(_) | Self::Internal(_) => {
                exit_code::GENERAL
            }
        }
    }

    /// Attach the config file path to a missing-setting error.
    pub fn with_config_path(self, config_path: &std::path::Path) -> Self {
        match self {
            Self::MissingConfig {
                key, env, legacy, ..
            } => Self::MissingConfig {
                key,
                env,
                legacy,
                path: config_path.display().to_string(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Api { message, status: _ } => CliError::Api { message },
            CoreError::Malformed { message } => CliError::Malformed { message },
            CoreError::UnknownLocation {
                location,
                available,
            } => CliError::UnknownLocation {
                location,
                available,
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { key, env, legacy } => CliError::MissingConfig {
                key: key.into(),
                env,
                legacy: legacy.into(),
                path: "the config file".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://h".into(),
                reason: "refused".into(),
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(CoreError::Api {
                message: "HTTP 500".into(),
                status: Some(500),
            })
            .exit_code(),
            exit_code::GENERAL
        );
        assert_eq!(
            CliError::from(CoreError::UnknownLocation {
                location: "x".into(),
                available: "gatsu".into(),
            })
            .exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(ConfigError::Validation {
                field: "locations".into(),
                reason: "list cannot be empty".into(),
            })
            .exit_code(),
            exit_code::USAGE
        );
    }

    #[test]
    fn missing_config_carries_path() {
        let err = CliError::MissingConfig {
            key: "api_url".into(),
            env: "CLIENTCOUNT_API_URL".into(),
            legacy: "NEXT_PUBLIC_API_URL".into(),
            path: String::new(),
        }
        .with_config_path(std::path::Path::new("/etc/clientcount.toml"));
        assert!(matches!(err, CliError::MissingConfig { ref path, .. } if path == "/etc/clientcount.toml"));
    }
}
