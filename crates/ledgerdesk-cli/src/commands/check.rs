//! Check a module permission for a user.

use clap::Args;
use serde::Serialize;

use ledgerdesk_auth::acl::PermissionSource;
use ledgerdesk_core::error::AppError;
use ledgerdesk_service::RequestContext;

use crate::output::{self, OutputFormat};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Email of the user to check
    #[arg(long = "as")]
    pub actor: String,

    /// Module key, e.g. `kosten`
    pub module: String,

    /// `view` or `edit`
    pub action: String,

    /// Restrict the check to an entity
    #[arg(long)]
    pub entity: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    module: String,
    action: String,
    entity: Option<String>,
    allowed: bool,
    source: PermissionSource,
}

/// Execute the check command
pub async fn execute(
    args: &CheckArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config_path).await?;
    let ctx = RequestContext::new(&args.actor);
    let resolved = state
        .permission_service
        .check(&ctx, &args.module, &args.action, args.entity.as_deref())
        .await?;

    let result = CheckResult {
        module: args.module.clone(),
        action: args.action.clone(),
        entity: args.entity.clone(),
        allowed: resolved.granted,
        source: resolved.source,
    };

    match format {
        OutputFormat::Json => output::print_item(&result, format),
        OutputFormat::Table => {
            output::print_kv("Module", &result.module);
            output::print_kv("Action", &result.action);
            output::print_kv("Entity", result.entity.as_deref().unwrap_or("-"));
            output::print_kv("Allowed", if result.allowed { "yes" } else { "no" });
            output::print_kv("Source", &format!("{:?}", result.source));
        }
    }
    Ok(())
}
