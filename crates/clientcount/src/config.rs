//! CLI configuration: a thin wrapper around `clientcount_config`.
//!
//! Loads the layered config, applies `GlobalOpts` flag overrides
//! (--api-url, --api-port, --timeout, --insecure, --locale), and builds
//! the fetcher every data command runs on.

use std::path::PathBuf;

use clientcount_core::{ClientCountClient, CoreError, Fetcher};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use clientcount_config::{Config, Locations, Settings, load_config_from, parse_locations, save_config_to};

/// The config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(clientcount_config::config_path)
}

/// Load the layered config with CLI flag overrides on top.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&config_file(global))?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url = Some(url.clone());
    }
    if let Some(port) = global.api_port {
        cfg.api_port = Some(port);
    }
    if let Some(secs) = global.timeout {
        cfg.timeout_secs = Some(secs);
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(ref locale) = global.locale {
        cfg.locale.clone_from(locale);
    }
}

/// Load and validate. Missing settings name the config file to edit.
pub fn resolve_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let cfg = load(global)?;
    Settings::resolve(&cfg).map_err(|e| CliError::from(e).with_config_path(&config_file(global)))
}

/// Build a fetcher with a private cache for one command run.
pub fn build_fetcher(settings: &Settings) -> Result<Fetcher, CliError> {
    let client = ClientCountClient::new(settings.base_url.clone(), &settings.transport)
        .map_err(CoreError::from)?;
    tracing::debug!(base_url = %settings.base_url, "telemetry client ready");
    Ok(Fetcher::new(client, settings.offset))
}
