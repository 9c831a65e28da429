//! In-memory view of all data files.

use ledgerdesk_entity::entity::EntityCatalog;
use ledgerdesk_entity::permission::{EntityPermissions, PermissionDocument, PermissionSet};
use ledgerdesk_entity::user::{User, UserProfile};

/// Everything read from the data directory for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataState {
    /// User profiles.
    pub users: Vec<UserProfile>,
    /// Legal entities.
    pub entities: EntityCatalog,
    /// Global permissions and entity overrides.
    pub permissions: PermissionDocument,
}

impl DataState {
    /// Resolve a user with its permission record.
    pub fn user(&self, email: &str) -> Option<User> {
        self.users
            .iter()
            .find(|p| p.email == email)
            .map(|p| User::from_parts(p, self.permissions.global_permissions.get(&p.email)))
    }

    /// Resolve every user with its permission record.
    pub fn all_users(&self) -> Vec<User> {
        self.users
            .iter()
            .map(|p| User::from_parts(p, self.permissions.global_permissions.get(&p.email)))
            .collect()
    }

    /// Whether a profile with `email` exists.
    pub fn contains_user(&self, email: &str) -> bool {
        self.users.iter().any(|p| p.email == email)
    }

    /// Insert or replace a profile.
    pub fn upsert_profile(&mut self, profile: UserProfile) {
        match self.users.iter_mut().find(|p| p.email == profile.email) {
            Some(existing) => *existing = profile,
            None => self.users.push(profile),
        }
    }

    /// The stored permission record of a user, if any.
    pub fn permission_set(&self, email: &str) -> Option<&PermissionSet> {
        self.permissions.global_permissions.get(email)
    }

    /// Insert or replace the permission record of a user.
    pub fn set_permission_set(&mut self, email: &str, set: PermissionSet) {
        self.permissions
            .global_permissions
            .insert(email.to_string(), set);
    }

    /// Entity-scoped overrides.
    pub fn overrides(&self) -> &EntityPermissions {
        &self.permissions.entity_permissions
    }

    /// Entity-scoped overrides for mutation.
    pub fn overrides_mut(&mut self) -> &mut EntityPermissions {
        &mut self.permissions.entity_permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_entity::user::Role;

    #[test]
    fn test_user_joins_profile_and_record() {
        let mut state = DataState::default();
        state.upsert_profile(UserProfile::new("chef@firma.de", "Chef"));
        state.set_permission_set("chef@firma.de", PermissionSet::unrestricted());
        state.upsert_profile(UserProfile::new("neu@firma.de", "Neu"));

        assert_eq!(
            state.user("chef@firma.de").unwrap().role,
            Role::Geschaeftsfuehrer
        );
        assert_eq!(state.user("neu@firma.de").unwrap().role, Role::Employee);
        assert!(state.user("nobody@firma.de").is_none());
        assert_eq!(state.all_users().len(), 2);
    }
}
