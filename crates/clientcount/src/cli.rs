//! Clap derive structures for the `clientcount` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.
//! Only depends on clap so the build script can generate man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clientcount -- client-count telemetry from the command line
#[derive(Debug, Parser)]
#[command(
    name = "clientcount",
    version,
    about = "View client-count telemetry (DHCP, dynamic, hotspot, guest) per location",
    long_about = "Fetches client-count samples for a location and session from the\n\
        telemetry service and renders them as a windowed time series plus the\n\
        latest counts.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "CLIENTCOUNT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Telemetry service host or URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Telemetry service port (overrides config)
    #[arg(long, global = true)]
    pub api_port: Option<u16>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIENTCOUNT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: no timeout beyond the transport's own)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Locale for number formatting (e.g. en-US, id-ID)
    #[arg(long, global = true)]
    pub locale: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, tab-separated (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Session bucket as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionArg {
    /// Morning session
    #[value(name = "pagi", alias = "morning")]
    Pagi,
    /// Afternoon session
    #[value(name = "siang", alias = "afternoon")]
    Siang,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the windowed client-count series and latest counts
    #[command(alias = "c")]
    Counts(CountsArgs),

    /// Show the latest counts for a location and session
    #[command(alias = "l")]
    Latest(QueryArgs),

    /// List configured locations
    #[command(alias = "loc")]
    Locations,

    /// Refresh one location and session on an interval
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Query Arguments ───────────────────────────────────────────

/// Which series to fetch.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Location key (defaults to the configured default, then the first location)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Session
    #[arg(long, short = 's')]
    pub session: Option<SessionArg>,
}

// ── Counts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CountsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Display window: 10, 20, 30, all, a custom count (1-1000), 7d, 1m, or 3m
    #[arg(long, short = 'w', default_value = "10", conflicts_with = "from")]
    pub window: String,

    /// Custom range start date (YYYY-MM-DD, display timezone)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Custom range end date (YYYY-MM-DD, display timezone, inclusive)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Metrics to show: all, none, or a comma list (dhcp,dynamic,hotspot,guest)
    #[arg(long, short = 'm', default_value = "all")]
    pub metrics: String,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Refresh interval (e.g. 30s, 5m)
    #[arg(long, short = 'i', default_value = "30s")]
    pub interval: String,

    /// Stop after this many refreshes
    #[arg(long, short = 'n')]
    pub count: Option<u32>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the current configuration (file + environment)
    Show,

    /// Write a starter config file from --api-url, --api-port, and --locations
    Init {
        /// Location keys: comma list or JSON array
        #[arg(long)]
        locations: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
