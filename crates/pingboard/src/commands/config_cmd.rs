//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?.redacted();
            let toml = cfg.to_toml()?;
            let rendered =
                output::render_single(&global.output, &cfg, |_| toml.clone(), |_| toml.clone())?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path(global);
            if force && path.exists() {
                std::fs::remove_file(&path)?;
            }
            if pingboard_config::write_default_config(&path)? {
                eprintln!("Wrote {}", path.display());
            } else {
                eprintln!("{} already exists; pass --force to replace it", path.display());
            }
            Ok(())
        }

        ConfigCommand::SetKey => {
            let cfg = config::load(global)?;
            let key = if io::stdin().is_terminal() {
                rpassword::prompt_password("API key: ")?
            } else {
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                line
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            pingboard_config::store_api_key(&cfg.source, key)?;
            eprintln!(
                "API key stored in system keyring (service '{}', account '{}')",
                pingboard_config::KEYRING_SERVICE,
                pingboard_config::keyring_user(&cfg.source)
            );
            Ok(())
        }
    }
}
