//! Presentation projections of engine decisions.

use serde::Serialize;

use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::entity::EntityCatalog;
use ledgerdesk_entity::permission::{Action, EntityPermissions};
use ledgerdesk_entity::user::{Role, User};

use crate::acl::AuthorizationEngine;

/// A role with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBadge {
    /// The role.
    pub role: Role,
    /// Human-readable label, e.g. "Mitarbeiter".
    pub label: &'static str,
}

/// Effective access to one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleAccess {
    /// Module key.
    pub module: String,
    /// Display label.
    pub label: String,
    /// Whether the module holds sensitive data.
    pub sensitive: bool,
    /// Effective view right.
    pub view: bool,
    /// Effective edit right.
    pub edit: bool,
}

/// One entity a user can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAccess {
    /// Entity id.
    pub entity_id: EntityId,
    /// Entity name.
    pub name: String,
    /// Whether the user manages the entity.
    pub manages: bool,
}

/// Badge for a role.
pub fn role_badge(role: Role) -> RoleBadge {
    RoleBadge {
        role,
        label: role.label(),
    }
}

/// Effective view/edit flags for every catalog module.
pub fn module_permissions_display(
    engine: &AuthorizationEngine,
    user: &User,
    overrides: &EntityPermissions,
    entity_id: Option<&str>,
) -> Vec<ModuleAccess> {
    engine
        .modules()
        .iter()
        .map(|module| ModuleAccess {
            module: module.key.clone(),
            label: module.label.clone(),
            sensitive: module.sensitive,
            view: engine.can(user, overrides, &module.key, Action::View, entity_id),
            edit: engine.can(user, overrides, &module.key, Action::Edit, entity_id),
        })
        .collect()
}

/// Entities the user can access, in catalog order.
pub fn entity_access_display(user: &User, entities: &EntityCatalog) -> Vec<EntityAccess> {
    entities
        .iter()
        .filter(|e| user.can_access(&e.id))
        .map(|e| EntityAccess {
            entity_id: e.id.clone(),
            name: e.name.clone(),
            manages: user.is_geschaeftsfuehrer() || AuthorizationEngine::is_manager_of(e, &user.email),
        })
        .collect()
}

/// Users `actor` may see in the user management list.
pub fn visible_users<'a>(
    engine: &AuthorizationEngine,
    actor: &User,
    users: &'a [User],
    entities: &EntityCatalog,
) -> Vec<&'a User> {
    match actor.role {
        Role::Geschaeftsfuehrer => users.iter().collect(),
        Role::Manager => {
            let scope = engine.managed_scope(actor, entities);
            users
                .iter()
                .filter(|u| {
                    u.email == actor.email
                        || u.accessible_entity_ids.iter().any(|id| scope.contains(id))
                })
                .collect()
        }
        Role::Employee => users.iter().filter(|u| u.email == actor.email).collect(),
    }
}
