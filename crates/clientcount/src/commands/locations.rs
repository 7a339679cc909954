//! `locations`: the configured allow-list with display labels.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct LocationEntry {
    key: String,
    label: String,
    default: bool,
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Default")]
    default: String,
}

impl From<&LocationEntry> for LocationRow {
    fn from(e: &LocationEntry) -> Self {
        Self {
            key: e.key.clone(),
            label: e.label.clone(),
            default: if e.default { "*".into() } else { String::new() },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let entries: Vec<LocationEntry> = settings
        .catalog
        .entries()
        .map(|(key, label)| LocationEntry {
            default: key == settings.default_query.location,
            key: key.to_owned(),
            label,
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |e| LocationRow::from(e),
        |e| e.key.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
