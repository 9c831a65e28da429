//! Module flag lookups against global permissions and entity overrides.

use ledgerdesk_entity::permission::{Action, EntityPermissions, ModuleCatalog};
use ledgerdesk_entity::user::User;

/// Looks up view/edit flags for modules of the configured catalog.
///
/// Modules outside the catalog never grant anything.
#[derive(Debug, Clone)]
pub struct ModuleAccessChecker {
    /// The injected module catalog.
    modules: ModuleCatalog,
}

impl ModuleAccessChecker {
    /// Creates a checker for the given catalog.
    pub fn new(modules: ModuleCatalog) -> Self {
        Self { modules }
    }

    /// The module catalog.
    pub fn modules(&self) -> &ModuleCatalog {
        &self.modules
    }

    /// Whether the entity override for `user` in `entity_id` grants `action`.
    pub fn override_allows(
        &self,
        user: &User,
        overrides: &EntityPermissions,
        entity_id: &str,
        module: &str,
        action: Action,
    ) -> bool {
        if !self.modules.contains(module) {
            return false;
        }
        overrides
            .get(entity_id, &user.email)
            .map(|entry| entry.permissions.allows(module, action))
            .unwrap_or(false)
    }

    /// Whether the user's global flags grant `action` on `module`.
    pub fn global_allows(&self, user: &User, module: &str, action: Action) -> bool {
        self.modules.contains(module) && user.module_permissions.allows(module, action)
    }
}
