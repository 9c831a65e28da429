//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use ledgerdesk_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Data directory", &config.store.data_dir);
                output::print_kv("Log level", &config.logging.level);
                let sensitive = config.modules.iter().filter(|m| m.sensitive).count();
                output::print_kv(
                    "Modules",
                    &format!("{} ({sensitive} sensitive)", config.modules.len()),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
