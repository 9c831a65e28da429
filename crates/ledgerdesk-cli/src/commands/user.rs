//! User management CLI commands.

use std::collections::BTreeSet;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ledgerdesk_core::error::AppError;
use ledgerdesk_entity::permission::{ModulePermission, ModulePermissions};
use ledgerdesk_entity::user::{Role, User};
use ledgerdesk_service::{InviteRequest, RequestContext};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List the users visible to the acting user
    List {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
    },
    /// Invite a new user
    Invite {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
        /// Email of the invited user
        email: String,
        /// Role: geschaeftsfuehrer, manager or employee
        #[arg(long, default_value = "employee")]
        role: String,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
        /// Accessible entity ids
        #[arg(long = "access", value_delimiter = ',')]
        accessible: Vec<String>,
        /// Managed entity ids
        #[arg(long = "manage", value_delimiter = ',')]
        managed: Vec<String>,
        /// Modules with view access
        #[arg(long, value_delimiter = ',')]
        view: Vec<String>,
        /// Modules with edit access
        #[arg(long, value_delimiter = ',')]
        edit: Vec<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Email
    email: String,
    /// Name
    name: String,
    /// Role
    role: String,
    /// Managed entities
    manages: String,
    /// Accessible entities
    access: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role.label().to_string(),
            manages: output::join(&u.managed_entity_ids),
            access: if u.is_geschaeftsfuehrer() {
                "all".to_string()
            } else {
                output::join(&u.accessible_entity_ids)
            },
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config_path).await?;

    match &args.command {
        UserCommand::List { actor } => {
            let users = state
                .user_service
                .list_visible(&RequestContext::new(actor))
                .await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Invite {
            actor,
            email,
            role,
            name,
            accessible,
            managed,
            view,
            edit,
        } => {
            let role: Role = role.parse()?;
            let user = state
                .permission_service
                .invite(
                    &RequestContext::new(actor),
                    InviteRequest {
                        email: email.clone(),
                        name: name.clone(),
                        role,
                        accessible_entity_ids: accessible.iter().cloned().collect(),
                        managed_entity_ids: managed.iter().cloned().collect(),
                        module_permissions: module_flags(view, edit),
                    },
                )
                .await?;

            match format {
                OutputFormat::Json => output::print_item(&user, format),
                OutputFormat::Table => {
                    output::print_success(&format!("User '{}' invited", user.email));
                    output::print_list(&[UserRow::from(&user)], format);
                }
            }
        }
    }

    Ok(())
}

/// Builds module flags; edit access implies view access.
fn module_flags(view: &[String], edit: &[String]) -> ModulePermissions {
    let modules: BTreeSet<&String> = view.iter().chain(edit.iter()).collect();
    modules
        .into_iter()
        .map(|m| (m.clone(), ModulePermission::new(true, edit.contains(m))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_entity::permission::Action;

    #[test]
    fn test_module_flags() {
        let flags = module_flags(&["kosten".to_string()], &["zahlungen".to_string()]);
        assert!(flags.allows("kosten", Action::View));
        assert!(!flags.allows("kosten", Action::Edit));
        assert!(flags.allows("zahlungen", Action::View));
        assert!(flags.allows("zahlungen", Action::Edit));
    }
}
