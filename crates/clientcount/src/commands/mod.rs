//! Command dispatch: bridges CLI args -> core fetcher -> output formatting.

pub mod config_cmd;
pub mod counts;
pub mod latest;
pub mod locations;
pub mod util;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a command that needs validated settings.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Counts(args) => counts::handle(settings, args, global).await,
        Command::Latest(args) => latest::handle(settings, args, global).await,
        Command::Locations => locations::handle(settings, global),
        Command::Watch(args) => watch::handle(settings, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need settings and is handled before dispatch".into(),
        )),
    }
}
