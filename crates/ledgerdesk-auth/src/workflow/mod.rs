//! Invitation and edit workflow.
//!
//! Orchestrates engine checks to build permission sets and to mutate entity
//! manager lists and overrides. The workflow mutates in-memory snapshots
//! only; persisting the result is the caller's job.

pub mod invitation;
pub mod managers;
pub mod overrides;

use std::sync::Arc;

use crate::acl::AuthorizationEngine;

pub use invitation::GrantRequest;

/// Validated mutations on permission sets, entities and overrides.
#[derive(Debug, Clone)]
pub struct PermissionWorkflow {
    /// The decision procedure every mutation is checked against.
    engine: Arc<AuthorizationEngine>,
}

impl PermissionWorkflow {
    /// Creates a workflow over the given engine.
    pub fn new(engine: Arc<AuthorizationEngine>) -> Self {
        Self { engine }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use ledgerdesk_core::config::modules::default_modules;
    use ledgerdesk_entity::EntityId;
    use ledgerdesk_entity::entity::{Entity, EntityCatalog};
    use ledgerdesk_entity::permission::{ModuleCatalog, ModulePermissions};
    use ledgerdesk_entity::user::{Role, User};

    use super::PermissionWorkflow;
    use crate::acl::AuthorizationEngine;

    pub fn workflow() -> PermissionWorkflow {
        PermissionWorkflow::new(Arc::new(AuthorizationEngine::new(
            ModuleCatalog::from_config(&default_modules()),
        )))
    }

    pub fn ids(list: &[&str]) -> BTreeSet<EntityId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn user(email: &str, role: Role, managed: &[&str], accessible: &[&str]) -> User {
        let set = AuthorizationEngine::build_user_permissions(
            role,
            &ids(accessible),
            &ModulePermissions::new(),
            &ids(managed),
        );
        User::with_permissions(email, email, set)
    }

    pub fn catalog() -> EntityCatalog {
        EntityCatalog::new(vec![
            Entity::new("E1", "Alpha GmbH", vec!["m@x.de".into()]),
            Entity::new("E2", "Beta GmbH", vec!["other@x.de".into()]),
            Entity::new("E3", "Gamma GmbH", vec!["m@x.de".into(), "other@x.de".into()]),
        ])
    }
}
