//! Entity manager lists and their mirror in user permission sets.
//!
//! An entity must keep at least one manager at all times.

use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::entity::{Entity, EntityCatalog};
use ledgerdesk_entity::permission::PermissionSet;
use ledgerdesk_entity::user::{Role, User, normalize_email};

use super::PermissionWorkflow;
use crate::acl::AuthorizationEngine;

impl PermissionWorkflow {
    /// Adds `email` to the managers of `entity_id`.
    ///
    /// The actor must be a geschaeftsfuehrer or already manage the entity.
    /// Adding an existing manager leaves the list unchanged.
    pub fn add_manager_to_entity(
        &self,
        actor: &User,
        entities: &mut EntityCatalog,
        entity_id: &str,
        email: &str,
    ) -> AppResult<Entity> {
        let email = normalize_email(email);
        let entity = entities
            .find_mut(entity_id)
            .ok_or_else(|| AppError::not_found(format!("Entity '{entity_id}' not found")))?;

        if !actor.is_geschaeftsfuehrer() && !AuthorizationEngine::is_manager_of(entity, &actor.email)
        {
            return Err(AppError::permission_denied(format!(
                "You do not manage entity '{entity_id}'"
            )));
        }

        if !entity.is_managed_by(&email) {
            entity.managers.push(email);
        }
        Ok(entity.clone())
    }

    /// Removes `email` from the managers of `entity_id`.
    ///
    /// The actor must be a geschaeftsfuehrer or another co-manager of the
    /// entity. The last manager of an entity cannot be removed.
    pub fn remove_manager(
        &self,
        actor: &User,
        entities: &mut EntityCatalog,
        entity_id: &str,
        email: &str,
    ) -> AppResult<Entity> {
        let email = normalize_email(email);
        let entity = entities
            .find_mut(entity_id)
            .ok_or_else(|| AppError::not_found(format!("Entity '{entity_id}' not found")))?;

        let co_manager =
            actor.email != email && AuthorizationEngine::is_manager_of(entity, &actor.email);
        if !actor.is_geschaeftsfuehrer() && !co_manager {
            return Err(AppError::permission_denied(format!(
                "You may not remove managers of entity '{entity_id}'"
            )));
        }

        if !entity.is_managed_by(&email) {
            return Err(AppError::not_found(format!(
                "'{email}' is not a manager of entity '{entity_id}'"
            )));
        }

        if entity.has_single_manager() {
            return Err(AppError::invariant_violation(format!(
                "'{email}' is the last manager of entity '{entity_id}'"
            )));
        }

        entity.managers.retain(|m| *m != email);
        Ok(entity.clone())
    }

    /// Creates a new entity. Only a geschaeftsfuehrer may do this.
    ///
    /// Without explicit managers the actor becomes the first manager.
    pub fn create_entity(
        &self,
        actor: &User,
        entities: &mut EntityCatalog,
        id: &str,
        name: &str,
        managers: Vec<String>,
    ) -> AppResult<Entity> {
        self.engine()
            .rbac()
            .require_minimum_role(&actor.role, &Role::Geschaeftsfuehrer)?;

        let id = id.trim();
        let name = name.trim();
        if id.is_empty() || name.is_empty() {
            return Err(AppError::validation("Entity id and name must not be empty"));
        }
        if entities.contains(id) {
            return Err(AppError::conflict(format!("Entity '{id}' already exists")));
        }

        let mut list: Vec<String> = Vec::new();
        for manager in managers.iter().map(|m| normalize_email(m)) {
            if !manager.is_empty() && !list.contains(&manager) {
                list.push(manager);
            }
        }
        if list.is_empty() {
            list.push(actor.email.clone());
        }

        let entity = Entity::new(id, name, list);
        entities.upsert(entity.clone());
        Ok(entity)
    }

    /// Records `entity_id` as managed in `set`.
    ///
    /// Employees cannot manage entities. A geschaeftsfuehrer set is the
    /// unrestricted sentinel and stays unchanged.
    pub fn attach_managed_entity(set: &mut PermissionSet, entity_id: &str) -> AppResult<()> {
        match set.role {
            Role::Geschaeftsfuehrer => Ok(()),
            Role::Employee => Err(AppError::invariant_violation(
                "Employees cannot manage entities",
            )),
            Role::Manager => {
                set.managed_entity_ids.insert(entity_id.to_string());
                set.accessible_entity_ids.insert(entity_id.to_string());
                Ok(())
            }
        }
    }

    /// Drops `entity_id` from the managed entities of `set`. Access is kept.
    pub fn detach_managed_entity(set: &mut PermissionSet, entity_id: &str) {
        set.managed_entity_ids.remove(entity_id);
    }

    /// Mirrors a change of `email`'s managed entities into the catalog.
    ///
    /// Newly managed entities list `email` as manager, dropped ones lose it.
    /// A geschaeftsfuehrer set removes nothing. Every entity is checked
    /// before the catalog is touched, so an error leaves it unchanged.
    pub fn sync_entity_managers(
        entities: &mut EntityCatalog,
        email: &str,
        before: &PermissionSet,
        after: &PermissionSet,
    ) -> AppResult<()> {
        let added: Vec<EntityId> = after
            .managed_entity_ids
            .difference(&before.managed_entity_ids)
            .cloned()
            .collect();
        if let Some(missing) = added.iter().find(|id| !entities.contains(id)) {
            return Err(AppError::not_found(format!("Entity '{missing}' not found")));
        }

        let dropped: Vec<EntityId> = if after.is_unrestricted() {
            Vec::new()
        } else {
            entities
                .managed_ids(email)
                .into_iter()
                .filter(|id| !after.managed_entity_ids.contains(id))
                .collect()
        };
        if let Some(stranded) = dropped
            .iter()
            .find(|id| entities.find(id).is_some_and(|e| e.has_single_manager()))
        {
            return Err(AppError::invariant_violation(format!(
                "'{email}' is the last manager of entity '{stranded}'"
            )));
        }

        for entity_id in &added {
            if let Some(entity) = entities.find_mut(entity_id) {
                if !entity.is_managed_by(email) {
                    entity.managers.push(email.to_string());
                }
            }
        }
        for entity_id in &dropped {
            if let Some(entity) = entities.find_mut(entity_id) {
                entity.managers.retain(|m| m != email);
            }
        }
        Ok(())
    }
}
