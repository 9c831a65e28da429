//! Entity listing, creation and manager maintenance.
//!
//! Manager lists on entities and `managedEntityIds` on user records are
//! updated together in one store transaction.

use std::sync::Arc;

use tracing::info;

use ledgerdesk_auth::PermissionWorkflow;
use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::entity::Entity;
use ledgerdesk_entity::permission::PermissionSet;
use ledgerdesk_entity::user::{Role, normalize_email};
use ledgerdesk_store::{DataState, DataStore};

use crate::context::RequestContext;

/// Manages legal entities and their managers.
#[derive(Debug, Clone)]
pub struct EntityService {
    /// Data store.
    store: Arc<DataStore>,
    /// Validated mutations.
    workflow: Arc<PermissionWorkflow>,
}

impl EntityService {
    /// Creates a new entity service.
    pub fn new(store: Arc<DataStore>, workflow: Arc<PermissionWorkflow>) -> Self {
        Self { store, workflow }
    }

    /// Entities the acting user may assign to others.
    pub async fn list_assignable(&self, ctx: &RequestContext) -> AppResult<Vec<Entity>> {
        let state = self.store.snapshot().await?;
        let actor = ctx.actor(&state)?;
        Ok(self
            .workflow
            .engine()
            .get_assignable_entities(&actor, &state.entities)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Creates an entity; every manager must be a registered user.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
        managers: Vec<String>,
    ) -> AppResult<Entity> {
        let entity = self
            .store
            .update(|state| {
                let actor = ctx.actor(state)?;
                let entity =
                    self.workflow
                        .create_entity(&actor, &mut state.entities, id, name, managers)?;
                for manager in &entity.managers {
                    attach(state, manager, &entity.id)?;
                }
                Ok(entity)
            })
            .await
            .inspect_err(|e| ctx.log_rejection("create_entity", e))?;

        info!(actor = %ctx.actor_email, entity_id = %entity.id, "Entity created");
        Ok(entity)
    }

    /// Adds a co-manager to an entity.
    pub async fn add_manager(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        email: &str,
    ) -> AppResult<Entity> {
        let email = normalize_email(email);
        let entity = self
            .store
            .update(|state| {
                let actor = ctx.actor(state)?;
                let entity =
                    self.workflow
                        .add_manager_to_entity(&actor, &mut state.entities, entity_id, &email)?;
                attach(state, &email, entity_id)?;
                Ok(entity)
            })
            .await
            .inspect_err(|e| ctx.log_rejection("add_manager", e))?;

        info!(actor = %ctx.actor_email, target = %email, entity_id, "Manager added");
        Ok(entity)
    }

    /// Removes a manager from an entity; the last manager stays.
    pub async fn remove_manager(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        email: &str,
    ) -> AppResult<Entity> {
        let email = normalize_email(email);
        let entity = self
            .store
            .update(|state| {
                let actor = ctx.actor(state)?;
                let entity =
                    self.workflow
                        .remove_manager(&actor, &mut state.entities, entity_id, &email)?;
                if let Some(set) = state.permission_set(&email) {
                    let mut set = set.clone();
                    PermissionWorkflow::detach_managed_entity(&mut set, entity_id);
                    state.set_permission_set(&email, set);
                }
                Ok(entity)
            })
            .await
            .inspect_err(|e| ctx.log_rejection("remove_manager", e))?;

        info!(actor = %ctx.actor_email, target = %email, entity_id, "Manager removed");
        Ok(entity)
    }
}

fn attach(state: &mut DataState, email: &str, entity_id: &str) -> AppResult<()> {
    if !state.contains_user(email) {
        return Err(AppError::not_found(format!("User '{email}' not found")));
    }
    let mut set = state
        .permission_set(email)
        .cloned()
        .unwrap_or_else(|| PermissionSet::empty(Role::Employee));
    PermissionWorkflow::attach_managed_entity(&mut set, entity_id)?;
    state.set_permission_set(email, set);
    Ok(())
}
