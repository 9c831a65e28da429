//! The authorization engine.
//!
//! Resolution order for a module check:
//! 1. Role bypass: a geschaeftsfuehrer may do everything.
//! 2. Entity override: when the check is scoped to an entity and the
//!    user's override there grants the action.
//! 3. Global flags: the user's own module permissions.
//! 4. Denied: anything unrecognised resolves to no access.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::entity::{Entity, EntityCatalog};
use ledgerdesk_entity::permission::{Action, EntityPermissions, ModuleCatalog, ModulePermissions, PermissionSet};
use ledgerdesk_entity::user::{Role, User};

use crate::rbac::RbacEnforcer;

use super::checker::ModuleAccessChecker;
use super::grant::{GrantDecision, GrantDenial};

/// Result of resolving a module check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermission {
    /// Whether access is granted.
    pub granted: bool,
    /// Where the decision came from.
    pub source: PermissionSource,
}

/// Where a permission decision was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// The user's role grants everything.
    Unrestricted,
    /// An entity-scoped override granted the action.
    EntityOverride,
    /// The user's global module flags granted the action.
    Global,
    /// No applicable grant was found.
    Denied,
}

/// Pure, side-effect-free decision procedure over user and entity snapshots.
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    /// Role hierarchy and ceilings.
    rbac: RbacEnforcer,
    /// Module flag lookups.
    checker: ModuleAccessChecker,
}

impl AuthorizationEngine {
    /// Creates an engine over the given module catalog.
    pub fn new(modules: ModuleCatalog) -> Self {
        Self {
            rbac: RbacEnforcer::new(),
            checker: ModuleAccessChecker::new(modules),
        }
    }

    /// Creates an engine with custom role policies.
    pub fn with_rbac(modules: ModuleCatalog, rbac: RbacEnforcer) -> Self {
        Self {
            rbac,
            checker: ModuleAccessChecker::new(modules),
        }
    }

    /// The module catalog this engine decides over.
    pub fn modules(&self) -> &ModuleCatalog {
        self.checker.modules()
    }

    /// The role enforcer.
    pub fn rbac(&self) -> &RbacEnforcer {
        &self.rbac
    }

    /// Resolves a module check, reporting which rule decided it.
    pub fn resolve(
        &self,
        actor: &User,
        overrides: &EntityPermissions,
        module: &str,
        action: Action,
        entity_id: Option<&str>,
    ) -> EffectivePermission {
        if self.rbac.is_geschaeftsfuehrer(&actor.role) {
            return EffectivePermission {
                granted: true,
                source: PermissionSource::Unrestricted,
            };
        }

        if let Some(entity_id) = entity_id {
            if self
                .checker
                .override_allows(actor, overrides, entity_id, module, action)
            {
                return EffectivePermission {
                    granted: true,
                    source: PermissionSource::EntityOverride,
                };
            }
        }

        if self.checker.global_allows(actor, module, action) {
            return EffectivePermission {
                granted: true,
                source: PermissionSource::Global,
            };
        }

        EffectivePermission {
            granted: false,
            source: PermissionSource::Denied,
        }
    }

    /// Can `actor` perform `action` on `module`, optionally within `entity_id`?
    pub fn can(
        &self,
        actor: &User,
        overrides: &EntityPermissions,
        module: &str,
        action: Action,
        entity_id: Option<&str>,
    ) -> bool {
        self.resolve(actor, overrides, module, action, entity_id)
            .granted
    }

    /// Whether `actor` may invite users at all.
    pub fn can_invite_users(&self, actor: &User) -> bool {
        self.rbac.can_invite(&actor.role)
    }

    /// Roles `actor` may hand out.
    pub fn assignable_roles(&self, actor: &User) -> Vec<Role> {
        self.rbac.assignable_roles(&actor.role)
    }

    /// Whether `email` is one of the entity's managers.
    pub fn is_manager_of(entity: &Entity, email: &str) -> bool {
        entity.is_managed_by(email)
    }

    /// Entities `actor` may assign to others.
    pub fn get_assignable_entities<'a>(
        &self,
        actor: &User,
        entities: &'a EntityCatalog,
    ) -> Vec<&'a Entity> {
        match actor.role {
            Role::Geschaeftsfuehrer => entities.iter().collect(),
            Role::Manager => entities
                .iter()
                .filter(|e| Self::is_manager_of(e, &actor.email))
                .collect(),
            Role::Employee => Vec::new(),
        }
    }

    /// Ids of the entities whose manager list contains `actor`.
    pub fn managed_scope(&self, actor: &User, entities: &EntityCatalog) -> BTreeSet<EntityId> {
        entities.managed_ids(&actor.email)
    }

    /// Whether `actor` may edit the permissions of `target`.
    ///
    /// Nobody edits themself through this path. A manager may only edit
    /// non-geschaeftsfuehrer users whose accessible entities all lie within
    /// the entities the manager manages.
    pub fn can_edit_user(&self, actor: &User, target: &User, entities: &EntityCatalog) -> bool {
        if actor.email == target.email {
            return false;
        }

        match actor.role {
            Role::Geschaeftsfuehrer => true,
            Role::Manager => {
                if target.role.is_geschaeftsfuehrer() {
                    return false;
                }
                let scope = self.managed_scope(actor, entities);
                target
                    .accessible_entity_ids
                    .iter()
                    .all(|id| scope.contains(id))
            }
            Role::Employee => false,
        }
    }

    /// Validates a grant of `target_role` with the given entity sets.
    pub fn can_grant_permissions(
        &self,
        actor: &User,
        target_role: Role,
        accessible_entity_ids: &BTreeSet<EntityId>,
        managed_entity_ids: &BTreeSet<EntityId>,
    ) -> GrantDecision {
        if !self.rbac.can_assign(&actor.role, &target_role) {
            return GrantDecision::Invalid(GrantDenial::RoleNotAssignable {
                actor: actor.role,
                target: target_role,
            });
        }

        if actor.role == Role::Manager {
            let outside = accessible_entity_ids
                .iter()
                .chain(managed_entity_ids.iter())
                .find(|id| !actor.managed_entity_ids.contains(*id));
            if let Some(entity_id) = outside {
                return GrantDecision::Invalid(GrantDenial::EntityOutOfScope {
                    entity_id: entity_id.clone(),
                });
            }
        }

        if target_role == Role::Employee && !managed_entity_ids.is_empty() {
            return GrantDecision::Invalid(GrantDenial::EmployeeCannotManage);
        }

        GrantDecision::Valid
    }

    /// Builds the permission set to persist for a user.
    ///
    /// A geschaeftsfuehrer always gets the unrestricted sentinel. For other
    /// roles managed entities are folded into the accessible ones.
    pub fn build_user_permissions(
        role: Role,
        accessible_entity_ids: &BTreeSet<EntityId>,
        module_permissions: &ModulePermissions,
        managed_entity_ids: &BTreeSet<EntityId>,
    ) -> PermissionSet {
        if role.is_geschaeftsfuehrer() {
            return PermissionSet::unrestricted();
        }

        let accessible = accessible_entity_ids
            .union(managed_entity_ids)
            .cloned()
            .collect();

        PermissionSet {
            role,
            managed_entity_ids: managed_entity_ids.clone(),
            accessible_entity_ids: accessible,
            permissions: module_permissions.clone(),
        }
    }
}
