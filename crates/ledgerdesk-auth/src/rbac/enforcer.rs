//! Role-level checks that do not depend on entities.

use ledgerdesk_core::error::AppError;
use ledgerdesk_entity::user::Role;

use super::policies::RolePolicies;

/// Enforces the role hierarchy and per-role ceilings.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RolePolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RolePolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RolePolicies) -> Self {
        Self { policies }
    }

    /// Whether the role may invite users.
    pub fn can_invite(&self, role: &Role) -> bool {
        self.policies.can_invite(role)
    }

    /// Returns `Ok(())` if the role may invite users.
    pub fn require_invite(&self, role: &Role) -> Result<(), AppError> {
        if self.can_invite(role) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Role '{role}' may not invite or edit users"
            )))
        }
    }

    /// Roles the given role may assign.
    pub fn assignable_roles(&self, role: &Role) -> Vec<Role> {
        self.policies.assignable_roles(role)
    }

    /// Whether `actor` may assign `target`.
    pub fn can_assign(&self, actor: &Role, target: &Role) -> bool {
        self.policies.can_assign(actor, target)
    }

    /// Checks whether the given role is at least the specified minimum role.
    ///
    /// Role hierarchy: Geschaeftsfuehrer > Manager > Employee
    pub fn require_minimum_role(
        &self,
        actual_role: &Role,
        minimum_role: &Role,
    ) -> Result<(), AppError> {
        if actual_role.has_at_least(minimum_role) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Role '{actual_role}' is insufficient; minimum required: '{minimum_role}'"
            )))
        }
    }

    /// Returns whether the role is unrestricted.
    pub fn is_geschaeftsfuehrer(&self, role: &Role) -> bool {
        role.is_geschaeftsfuehrer()
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RolePolicies {
        &self.policies
    }
}
