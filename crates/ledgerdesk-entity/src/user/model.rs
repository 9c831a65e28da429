//! User entity model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::EntityId;
use crate::permission::{ModulePermissions, PermissionSet};

/// A stored user profile (`users.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl UserProfile {
    /// Create a profile, normalizing the email.
    pub fn new(email: &str, name: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            name: name.into(),
        }
    }
}

/// A user together with its resolved global permissions.
///
/// This is the snapshot the authorization engine decides on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Entities this user manages.
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Entities this user may access.
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Global module flags.
    pub module_permissions: ModulePermissions,
}

impl User {
    /// Join a profile with its permission record.
    ///
    /// A profile without a record is an employee with no access.
    pub fn from_parts(profile: &UserProfile, permissions: Option<&PermissionSet>) -> Self {
        let set = permissions
            .cloned()
            .unwrap_or_else(|| PermissionSet::empty(Role::Employee));
        Self::with_permissions(&profile.email, &profile.name, set)
    }

    /// Build a user from an email, name and permission set.
    pub fn with_permissions(email: &str, name: &str, set: PermissionSet) -> Self {
        Self {
            email: normalize_email(email),
            name: name.to_string(),
            role: set.role,
            managed_entity_ids: set.managed_entity_ids,
            accessible_entity_ids: set.accessible_entity_ids,
            module_permissions: set.permissions,
        }
    }

    /// The permission record backing this user.
    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet {
            role: self.role,
            managed_entity_ids: self.managed_entity_ids.clone(),
            accessible_entity_ids: self.accessible_entity_ids.clone(),
            permissions: self.module_permissions.clone(),
        }
    }

    /// The profile part of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    /// Whether this user holds the unrestricted role.
    pub fn is_geschaeftsfuehrer(&self) -> bool {
        self.role.is_geschaeftsfuehrer()
    }

    /// Whether the stored record lists `entity_id` as managed.
    pub fn manages(&self, entity_id: &str) -> bool {
        self.managed_entity_ids.contains(entity_id)
    }

    /// Whether the user may access `entity_id`.
    pub fn can_access(&self, entity_id: &str) -> bool {
        self.is_geschaeftsfuehrer() || self.accessible_entity_ids.contains(entity_id)
    }
}

/// Canonical form of an email identifier (trimmed, lowercase).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
