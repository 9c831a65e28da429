//! Register the first Geschäftsführer.

use clap::Args;
use dialoguer::Input;

use ledgerdesk_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Email of the owner
    #[arg(long)]
    pub email: String,

    /// Display name; prompted for when omitted
    #[arg(long)]
    pub name: Option<String>,
}

/// Execute the init command
pub async fn execute(
    args: &InitArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => Input::<String>::new()
            .with_prompt("Name")
            .interact_text()
            .map_err(|e| AppError::validation(format!("Failed to read name: {e}")))?,
    };

    let state = super::open_state(config_path).await?;
    let owner = state.user_service.bootstrap_owner(&args.email, &name).await?;

    match format {
        OutputFormat::Json => output::print_item(&owner, format),
        OutputFormat::Table => {
            output::print_success(&format!("Registered '{}' as {}", owner.email, owner.role.label()));
        }
    }
    Ok(())
}
