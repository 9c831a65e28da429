//! Inviting users and editing their permission sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::entity::EntityCatalog;
use ledgerdesk_entity::permission::{ModulePermissions, PermissionSet};
use ledgerdesk_entity::user::{Role, User};

use super::PermissionWorkflow;
use crate::acl::AuthorizationEngine;

/// The permissions an actor wants to hand to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    /// The user receiving the grant.
    pub target_email: String,
    /// Requested role.
    pub role: Role,
    /// Requested accessible entities.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Requested managed entities.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Requested global module flags.
    #[serde(default)]
    pub module_permissions: ModulePermissions,
}

impl PermissionWorkflow {
    /// Validates an invitation and returns the permission set to persist.
    pub fn invite(
        &self,
        actor: &User,
        entities: &EntityCatalog,
        request: GrantRequest,
    ) -> AppResult<PermissionSet> {
        self.engine().rbac().require_invite(&actor.role)?;
        self.build_checked(actor, entities, request)
    }

    /// Validates an edit of `target`'s permissions and returns the new set.
    pub fn edit_permissions(
        &self,
        actor: &User,
        target: &User,
        entities: &EntityCatalog,
        request: GrantRequest,
    ) -> AppResult<PermissionSet> {
        self.engine().rbac().require_invite(&actor.role)?;
        if !self.engine().can_edit_user(actor, target, entities) {
            return Err(AppError::permission_denied(format!(
                "You may not edit the permissions of '{}'",
                target.email
            )));
        }
        self.build_checked(actor, entities, request)
    }

    fn build_checked(
        &self,
        actor: &User,
        entities: &EntityCatalog,
        request: GrantRequest,
    ) -> AppResult<PermissionSet> {
        let GrantRequest {
            target_email,
            role,
            accessible_entity_ids,
            managed_entity_ids,
            mut module_permissions,
        } = request;

        self.engine()
            .can_grant_permissions(actor, role, &accessible_entity_ids, &managed_entity_ids)
            .into_result()?;

        if !role.is_geschaeftsfuehrer() {
            if let Some(unknown) = accessible_entity_ids
                .iter()
                .chain(managed_entity_ids.iter())
                .find(|id| !entities.contains(id))
            {
                return Err(AppError::validation(format!(
                    "Entity '{unknown}' does not exist"
                )));
            }
        }

        let dropped = module_permissions.retain_known(self.engine().modules());
        if !dropped.is_empty() {
            debug!(target = %target_email, modules = ?dropped, "Dropped unknown modules from grant");
        }

        Ok(AuthorizationEngine::build_user_permissions(
            role,
            &accessible_entity_ids,
            &module_permissions,
            &managed_entity_ids,
        ))
    }
}
