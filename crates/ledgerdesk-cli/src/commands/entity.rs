//! Entity and manager CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ledgerdesk_core::error::AppError;
use ledgerdesk_entity::entity::Entity;
use ledgerdesk_service::RequestContext;

use crate::output::{self, OutputFormat};

/// Arguments for entity commands
#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity subcommand
    #[command(subcommand)]
    pub command: EntityCommand,
}

/// Entity subcommands
#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// List entities the acting user may assign
    List {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
    },
    /// Create an entity
    Create {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
        /// Entity id
        id: String,
        /// Display name
        name: String,
        /// Initial managers
        #[arg(long = "manager", value_delimiter = ',')]
        managers: Vec<String>,
    },
    /// Add a co-manager
    AddManager {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
        /// Entity id
        entity: String,
        /// Email of the new manager
        email: String,
    },
    /// Remove a manager
    RemoveManager {
        /// Acting user's email
        #[arg(long = "as")]
        actor: String,
        /// Entity id
        entity: String,
        /// Email of the manager to remove
        email: String,
    },
}

/// Entity display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EntityRow {
    /// Id
    id: String,
    /// Name
    name: String,
    /// Managers
    managers: String,
}

impl From<&Entity> for EntityRow {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            managers: output::join(&e.managers),
        }
    }
}

/// Execute entity commands
pub async fn execute(
    args: &EntityArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config_path).await?;
    let service = &state.entity_service;

    let entity = match &args.command {
        EntityCommand::List { actor } => {
            let entities = service.list_assignable(&RequestContext::new(actor)).await?;
            let rows: Vec<EntityRow> = entities.iter().map(EntityRow::from).collect();
            output::print_list(&rows, format);
            return Ok(());
        }
        EntityCommand::Create {
            actor,
            id,
            name,
            managers,
        } => {
            service
                .create(&RequestContext::new(actor), id, name, managers.clone())
                .await?
        }
        EntityCommand::AddManager {
            actor,
            entity,
            email,
        } => {
            service
                .add_manager(&RequestContext::new(actor), entity, email)
                .await?
        }
        EntityCommand::RemoveManager {
            actor,
            entity,
            email,
        } => {
            service
                .remove_manager(&RequestContext::new(actor), entity, email)
                .await?
        }
    };

    match format {
        OutputFormat::Json => output::print_item(&entity, format),
        OutputFormat::Table => {
            output::print_success(&format!("Entity '{}' updated", entity.id));
            output::print_list(&[EntityRow::from(&entity)], format);
        }
    }
    Ok(())
}
