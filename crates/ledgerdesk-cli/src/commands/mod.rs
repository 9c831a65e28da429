//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod entity;
pub mod init;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use ledgerdesk_api::AppState;
use ledgerdesk_core::config::AppConfig;
use ledgerdesk_core::error::AppError;

use crate::output::OutputFormat;

/// Ledgerdesk: permissions back office for small-business finance
#[derive(Debug, Parser)]
#[command(name = "ledgerdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Ledgerdesk server
    Serve(serve::ServeArgs),
    /// Register the first Geschäftsführer
    Init(init::InitArgs),
    /// Check a module permission for a user
    Check(check::CheckArgs),
    /// User management
    User(user::UserArgs),
    /// Entity and manager management
    Entity(entity::EntityArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Init(args) => init::execute(args, &self.config, self.format).await,
            Commands::Check(args) => check::execute(args, &self.config, self.format).await,
            Commands::User(args) => user::execute(args, &self.config, self.format).await,
            Commands::Entity(args) => entity::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}

/// Helper: open the store and wire services from configuration
pub async fn open_state(config_path: &str) -> Result<AppState, AppError> {
    AppState::new(load_config(config_path)?).await
}
