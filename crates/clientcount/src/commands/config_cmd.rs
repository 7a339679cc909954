//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Locations, Settings};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = output::render_single(&global.output, &cfg, to_toml, to_toml);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { locations, force } => {
            let path = config::config_file(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = Config {
                api_url: Some(required(global.api_url.clone(), "api-url")?),
                api_port: Some(required(global.api_port, "api-port")?),
                locations: Some(Locations::List(config::parse_locations(&locations)?)),
                ..Config::default()
            };
            // Refuse to write something that would not load.
            Settings::resolve(&cfg)?;

            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, CliError> {
    value.ok_or_else(|| CliError::Validation {
        field: flag.into(),
        reason: format!("--{flag} is required for config init"),
    })
}

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
