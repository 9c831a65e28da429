//! Role-to-capability mapping definitions.

use std::collections::{HashMap, HashSet};

use ledgerdesk_entity::user::Role;

/// Defines, for each role, which roles it may assign and whether it may
/// invite users at all.
#[derive(Debug, Clone)]
pub struct RolePolicies {
    /// Role → roles it may hand out.
    assignable: HashMap<Role, HashSet<Role>>,
}

impl RolePolicies {
    /// Creates the default policy set.
    ///
    /// A geschaeftsfuehrer may assign every role, a manager may assign
    /// manager and employee (within the entities it manages), an employee
    /// may assign nothing.
    pub fn new() -> Self {
        let mut assignable: HashMap<Role, HashSet<Role>> = HashMap::new();

        assignable.insert(Role::Geschaeftsfuehrer, Role::ALL.into_iter().collect());

        let mut manager = HashSet::new();
        manager.insert(Role::Manager);
        manager.insert(Role::Employee);
        assignable.insert(Role::Manager, manager);

        assignable.insert(Role::Employee, HashSet::new());

        Self { assignable }
    }

    /// Returns the roles `actor_role` may assign, most privileged first.
    pub fn assignable_roles(&self, actor_role: &Role) -> Vec<Role> {
        let Some(roles) = self.assignable.get(actor_role) else {
            return Vec::new();
        };
        Role::ALL
            .into_iter()
            .filter(|r| roles.contains(r))
            .collect()
    }

    /// Checks whether `actor_role` may assign `target_role`.
    pub fn can_assign(&self, actor_role: &Role, target_role: &Role) -> bool {
        self.assignable
            .get(actor_role)
            .map(|roles| roles.contains(target_role))
            .unwrap_or(false)
    }

    /// Checks whether `actor_role` may invite users at all.
    pub fn can_invite(&self, actor_role: &Role) -> bool {
        self.assignable
            .get(actor_role)
            .map(|roles| !roles.is_empty())
            .unwrap_or(false)
    }
}

impl Default for RolePolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignable_roles() {
        let policies = RolePolicies::new();
        assert_eq!(
            policies.assignable_roles(&Role::Geschaeftsfuehrer),
            vec![Role::Geschaeftsfuehrer, Role::Manager, Role::Employee]
        );
        assert_eq!(
            policies.assignable_roles(&Role::Manager),
            vec![Role::Manager, Role::Employee]
        );
        assert!(policies.assignable_roles(&Role::Employee).is_empty());
    }

    #[test]
    fn test_manager_cannot_assign_geschaeftsfuehrer() {
        let policies = RolePolicies::new();
        assert!(!policies.can_assign(&Role::Manager, &Role::Geschaeftsfuehrer));
        assert!(policies.can_assign(&Role::Manager, &Role::Employee));
        assert!(!policies.can_invite(&Role::Employee));
    }
}
