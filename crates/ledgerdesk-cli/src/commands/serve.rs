//! Start the Ledgerdesk server.

use clap::Args;
use tracing::info;

use ledgerdesk_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the data directory
    #[arg(long)]
    pub data_dir: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref data_dir) = args.data_dir {
        config.store.data_dir = data_dir.clone();
    }

    println!("Starting Ledgerdesk server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Data: {}", config.store.data_dir);

    info!(
        log_level = %config.logging.level,
        modules = config.modules.len(),
        "Serving from CLI"
    );

    ledgerdesk_api::run_server(config).await
}
