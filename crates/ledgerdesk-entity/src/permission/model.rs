//! Permission records as stored in `permissions.json`.
//!
//! ```json
//! { "globalPermissions": { "<email>": { "role": "...", "managedEntityIds": [],
//!     "accessibleEntityIds": [], "permissions": { "<module>": {"view": true, "edit": false} } } },
//!   "entityPermissions": { "<entityId>": { "<email>": { "permissions": { } } } } }
//! ```
//!
//! Absent entries always read as "no access": a missing module is
//! `{view: false, edit: false}`, a missing flag is `false`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::module::ModuleCatalog;
use crate::EntityId;
use crate::user::Role;

/// View/edit flags for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermission {
    /// Read access.
    #[serde(default)]
    pub view: bool,
    /// Write access.
    #[serde(default)]
    pub edit: bool,
}

impl ModulePermission {
    /// Create a flag pair.
    pub fn new(view: bool, edit: bool) -> Self {
        Self { view, edit }
    }

    /// Whether the flag for `action` is set.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Edit => self.edit,
        }
    }
}

/// Mapping from module key to its view/edit flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePermissions(BTreeMap<String, ModulePermission>);

impl ModulePermissions {
    /// An empty mapping (no access to anything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags for a module; absent modules resolve to no access.
    pub fn get(&self, module: &str) -> ModulePermission {
        self.0.get(module).copied().unwrap_or_default()
    }

    /// Whether `action` is granted on `module`.
    pub fn allows(&self, module: &str, action: Action) -> bool {
        self.get(module).allows(action)
    }

    /// Set the flags for a module.
    pub fn set(&mut self, module: impl Into<String>, permission: ModulePermission) {
        self.0.insert(module.into(), permission);
    }

    /// Builder form of [`ModulePermissions::set`].
    pub fn with(mut self, module: impl Into<String>, view: bool, edit: bool) -> Self {
        self.set(module, ModulePermission::new(view, edit));
        self
    }

    /// Drop modules unknown to the catalog, returning the removed keys.
    pub fn retain_known(&mut self, catalog: &ModuleCatalog) -> Vec<String> {
        let unknown: Vec<String> = self
            .0
            .keys()
            .filter(|key| !catalog.contains(key))
            .cloned()
            .collect();
        for key in &unknown {
            self.0.remove(key);
        }
        unknown
    }

    /// Iterate the explicit entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModulePermission)> {
        self.0.iter()
    }

    /// Whether no module has an explicit entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ModulePermission)> for ModulePermissions {
    fn from_iter<I: IntoIterator<Item = (String, ModulePermission)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The global permission record of one user.
///
/// For [`Role::Geschaeftsfuehrer`] the record is the unrestricted sentinel:
/// entity lists and module flags are empty and ignored, the role alone
/// grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// Role of the user.
    pub role: Role,
    /// Entities the user manages. Always a subset of `accessible_entity_ids`.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Entities the user may access.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Global module flags.
    #[serde(default)]
    pub permissions: ModulePermissions,
}

impl PermissionSet {
    /// The unrestricted geschaeftsfuehrer sentinel.
    pub fn unrestricted() -> Self {
        Self {
            role: Role::Geschaeftsfuehrer,
            managed_entity_ids: BTreeSet::new(),
            accessible_entity_ids: BTreeSet::new(),
            permissions: ModulePermissions::new(),
        }
    }

    /// A record granting nothing, used for users without a stored record.
    pub fn empty(role: Role) -> Self {
        Self {
            role,
            managed_entity_ids: BTreeSet::new(),
            accessible_entity_ids: BTreeSet::new(),
            permissions: ModulePermissions::new(),
        }
    }

    /// Whether this is the unrestricted sentinel.
    pub fn is_unrestricted(&self) -> bool {
        self.role.is_geschaeftsfuehrer()
    }
}

/// Entity-scoped module flags for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityOverride {
    /// Module flags that apply within the entity.
    #[serde(default)]
    pub permissions: ModulePermissions,
}

/// Entity id → user email → override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityPermissions(BTreeMap<EntityId, BTreeMap<String, EntityOverride>>);

impl EntityPermissions {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// The override for a user within an entity, if any.
    pub fn get(&self, entity_id: &str, email: &str) -> Option<&EntityOverride> {
        self.0.get(entity_id).and_then(|users| users.get(email))
    }

    /// All overrides within an entity.
    pub fn for_entity(&self, entity_id: &str) -> Option<&BTreeMap<String, EntityOverride>> {
        self.0.get(entity_id)
    }

    /// Insert or replace an override.
    pub fn set(
        &mut self,
        entity_id: impl Into<EntityId>,
        email: impl Into<String>,
        permissions: ModulePermissions,
    ) {
        self.0
            .entry(entity_id.into())
            .or_default()
            .insert(email.into(), EntityOverride { permissions });
    }

    /// Remove an override; returns whether one existed.
    ///
    /// Entities left without overrides are pruned.
    pub fn remove(&mut self, entity_id: &str, email: &str) -> bool {
        let Some(users) = self.0.get_mut(entity_id) else {
            return false;
        };
        let removed = users.remove(email).is_some();
        if users.is_empty() {
            self.0.remove(entity_id);
        }
        removed
    }

    /// Iterate entity ids with their overrides.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &BTreeMap<String, EntityOverride>)> {
        self.0.iter()
    }
}

/// The whole `permissions.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDocument {
    /// Global permission record per user email.
    #[serde(default)]
    pub global_permissions: BTreeMap<String, PermissionSet>,
    /// Entity-scoped overrides.
    #[serde(default)]
    pub entity_permissions: EntityPermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_module_denies() {
        let perms = ModulePermissions::new().with("kosten", true, false);
        assert!(perms.allows("kosten", Action::View));
        assert!(!perms.allows("kosten", Action::Edit));
        assert!(!perms.allows("bankkonten", Action::View));
    }

    #[test]
    fn test_document_parses_stored_format() {
        let json = r#"{
            "globalPermissions": {
                "anna@example.com": {
                    "role": "manager",
                    "managedEntityIds": ["E1"],
                    "accessibleEntityIds": ["E1", "E2"],
                    "permissions": { "kosten": { "view": true } }
                },
                "chef@example.com": { "role": "geschaeftsfuehrer" }
            },
            "entityPermissions": {
                "E2": { "anna@example.com": { "permissions": { "zahlungen": { "view": true, "edit": true } } } }
            }
        }"#;
        let doc: PermissionDocument = serde_json::from_str(json).unwrap();

        let anna = &doc.global_permissions["anna@example.com"];
        assert_eq!(anna.role, Role::Manager);
        assert!(anna.managed_entity_ids.contains("E1"));
        assert!(!anna.permissions.get("kosten").edit);

        assert!(doc.global_permissions["chef@example.com"].is_unrestricted());

        let entry = doc
            .entity_permissions
            .get("E2", "anna@example.com")
            .unwrap();
        assert!(entry.permissions.allows("zahlungen", Action::Edit));
    }

    #[test]
    fn test_remove_override_prunes_entity() {
        let mut overrides = EntityPermissions::new();
        overrides.set("E1", "a@x.de", ModulePermissions::new().with("kosten", true, true));
        assert!(overrides.remove("E1", "a@x.de"));
        assert!(overrides.for_entity("E1").is_none());
        assert!(!overrides.remove("E1", "a@x.de"));
    }

    #[test]
    fn test_retain_known_drops_unknown_modules() {
        let catalog = ModuleCatalog::new(vec![crate::permission::Module {
            key: "kosten".to_string(),
            label: "Kosten".to_string(),
            sensitive: false,
        }]);
        let mut perms = ModulePermissions::new()
            .with("kosten", true, false)
            .with("raumschiff", true, true);
        let dropped = perms.retain_known(&catalog);
        assert_eq!(dropped, vec!["raumschiff".to_string()]);
        assert!(perms.allows("kosten", Action::View));
    }
}
