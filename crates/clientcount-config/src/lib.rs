//! Configuration for clientcount tools.
//!
//! A TOML file plus environment variables, layered with `figment`, then
//! validated into [`Settings`]: the resolved base URL, the location
//! catalog, the display offset, and transport options. Everything the
//! fetcher needs to start is required up front; a missing value is a
//! startup error, never a runtime one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use clientcount_core::{LocationCatalog, Query, Session, TlsMode, TransportConfig, TzOffset};

/// Prefix for native environment overrides (`CLIENTCOUNT_API_URL`, ...).
pub const ENV_PREFIX: &str = "CLIENTCOUNT_";

/// Environment names kept for deployments configured the old way.
pub const LEGACY_API_URL: &str = "NEXT_PUBLIC_API_URL";
pub const LEGACY_API_PORT: &str = "NEXT_PUBLIC_API_PORT";
pub const LEGACY_LOCATIONS: &str = "NEXT_PUBLIC_KAWASAN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{key}' (set it in the config file, {env}, or {legacy})")]
    Missing {
        key: &'static str,
        env: String,
        legacy: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn missing(key: &'static str, legacy: &'static str) -> Self {
        Self::Missing {
            key,
            env: format!("{ENV_PREFIX}{}", key.to_ascii_uppercase()),
            legacy,
        }
    }

    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Location allow-list as written by the operator: a TOML array, or a
/// single string holding a JSON array or a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locations {
    List(Vec<String>),
    Text(String),
}

impl Locations {
    /// Normalized keys. Never empty.
    pub fn keys(&self) -> Result<Vec<String>, ConfigError> {
        match self {
            Self::Text(raw) => parse_locations(raw),
            Self::List(items) => non_empty(items.iter().map(|s| unquote(s).to_owned())),
        }
    }
}

/// Raw configuration, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Telemetry service host, with or without a scheme.
    pub api_url: Option<String>,

    /// Telemetry service port.
    pub api_port: Option<u16>,

    /// Allowed location keys.
    pub locations: Option<Locations>,

    /// Extra or overriding display labels, keyed by location.
    #[serde(default)]
    pub location_labels: BTreeMap<String, String>,

    /// Display offset from UTC, in minutes.
    #[serde(default = "default_offset")]
    pub timezone_offset_minutes: i32,

    /// Request timeout. Unset leaves the transport default.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Locale for number formatting.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Location selected at startup. Defaults to the first configured one.
    pub default_location: Option<String>,

    /// Session selected at startup (`pagi`/`morning` or `siang`/`afternoon`).
    pub default_session: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_port: None,
            locations: None,
            location_labels: BTreeMap::new(),
            timezone_offset_minutes: default_offset(),
            timeout_secs: None,
            insecure: false,
            ca_cert: None,
            locale: default_locale(),
            default_location: None,
            default_session: None,
        }
    }
}

fn default_offset() -> i32 {
    TzOffset::WIB.minutes()
}
fn default_locale() -> String {
    "en-US".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("id", "brin", "clientcount").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("clientcount");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// The layered provider stack: defaults, TOML file, native environment,
/// then the legacy environment names.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(
            Env::raw()
                .only(&[LEGACY_API_URL, LEGACY_API_PORT, LEGACY_LOCATIONS])
                .map(|key| {
                    let key = key.as_str();
                    if key.eq_ignore_ascii_case(LEGACY_API_URL) {
                        "api_url".into()
                    } else if key.eq_ignore_ascii_case(LEGACY_API_PORT) {
                        "api_port".into()
                    } else {
                        "locations".into()
                    }
                }),
        )
}

/// Load config from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path and the environment. A missing
/// file is not an error; required keys may come from the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Location list parsing ───────────────────────────────────────────

/// Parse a location list from a JSON array or a comma-separated string.
///
/// Surrounding quotes are stripped from the whole value and from each
/// entry; blank entries are dropped. The result is never empty.
pub fn parse_locations(raw: &str) -> Result<Vec<String>, ConfigError> {
    let raw = unquote(raw);
    if raw.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| ConfigError::invalid("locations", format!("not a JSON array of strings: {e}")))?;
        return non_empty(items.iter().map(|s| unquote(s).to_owned()));
    }
    non_empty(raw.split(',').map(|s| unquote(s).to_owned()))
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    s
}

fn non_empty(items: impl Iterator<Item = String>) -> Result<Vec<String>, ConfigError> {
    let keys: Vec<String> = items.filter(|s| !s.is_empty()).collect();
    if keys.is_empty() {
        return Err(ConfigError::invalid("locations", "list cannot be empty"));
    }
    Ok(keys)
}

// ── Validated settings ──────────────────────────────────────────────

/// Validated configuration, ready to build a client and a fetcher.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub catalog: LocationCatalog,
    pub offset: TzOffset,
    pub transport: TransportConfig,
    pub locale: String,
    /// Initial selection.
    pub default_query: Query,
}

impl Settings {
    /// Validate a raw [`Config`].
    pub fn resolve(config: &Config) -> Result<Self, ConfigError> {
        let api_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::missing("api_url", LEGACY_API_URL))?;
        let api_port = config
            .api_port
            .ok_or_else(|| ConfigError::missing("api_port", LEGACY_API_PORT))?;
        let keys = config
            .locations
            .as_ref()
            .ok_or_else(|| ConfigError::missing("locations", LEGACY_LOCATIONS))?
            .keys()?;

        let base_url = resolve_base_url(api_url, api_port)?;

        let catalog = LocationCatalog::new(keys)
            .map_err(|e| ConfigError::invalid("locations", e.to_string()))?
            .with_labels(config.location_labels.clone());

        let offset = TzOffset::from_minutes(config.timezone_offset_minutes)
            .map_err(|e| ConfigError::invalid("timezone_offset_minutes", e.to_string()))?;

        let location = match config.default_location.as_deref() {
            Some(location) => {
                catalog
                    .validate(location)
                    .map_err(|e| ConfigError::invalid("default_location", e.to_string()))?;
                location.to_owned()
            }
            None => catalog.first().to_owned(),
        };
        let session = match config.default_session.as_deref() {
            Some(raw) => raw
                .parse::<Session>()
                .map_err(|e| ConfigError::invalid("default_session", e.to_string()))?,
            None => Session::Morning,
        };

        Ok(Self {
            base_url,
            catalog,
            offset,
            transport: transport_config(config),
            locale: config.locale.clone(),
            default_query: Query::new(location, session),
        })
    }
}

/// Combine host and port into a base URL. A bare host gets `http://`.
fn resolve_base_url(api_url: &str, port: u16) -> Result<Url, ConfigError> {
    let with_scheme = if api_url.contains("://") {
        api_url.to_owned()
    } else {
        format!("http://{api_url}")
    };
    let mut url: Url = with_scheme
        .parse()
        .map_err(|e| ConfigError::invalid("api_url", format!("{e}: {api_url}")))?;
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(ConfigError::invalid("api_url", format!("not a host URL: {api_url}")));
    }
    url.set_port(Some(port))
        .map_err(|()| ConfigError::invalid("api_port", format!("cannot apply port {port}")))?;
    Ok(url)
}

fn transport_config(config: &Config) -> TransportConfig {
    let tls = if config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca) = config.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    };
    let transport = TransportConfig {
        tls,
        ..TransportConfig::default()
    };
    match config.timeout_secs {
        Some(secs) => transport.with_timeout(Duration::from_secs(secs)),
        None => transport,
    }
}
