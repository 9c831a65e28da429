//! Outcome of validating a permission grant.

use thiserror::Error;

use ledgerdesk_core::error::AppError;
use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::user::Role;

/// Why a grant was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantDenial {
    /// The target role is above the actor's ceiling.
    #[error("role '{actor}' may not assign role '{target}'")]
    RoleNotAssignable {
        /// Role of the acting user.
        actor: Role,
        /// Requested role.
        target: Role,
    },
    /// An entity id is outside the entities the actor manages.
    #[error("entity '{entity_id}' is outside the entities you manage")]
    EntityOutOfScope {
        /// The offending entity id.
        entity_id: EntityId,
    },
    /// Managed entities were requested for an employee.
    #[error("employees cannot manage entities")]
    EmployeeCannotManage,
}

impl From<GrantDenial> for AppError {
    fn from(denial: GrantDenial) -> Self {
        let message = denial.to_string();
        match denial {
            GrantDenial::RoleNotAssignable { .. } => AppError::invalid_role_assignment(message),
            GrantDenial::EntityOutOfScope { .. } => AppError::scope_violation(message),
            GrantDenial::EmployeeCannotManage => AppError::invariant_violation(message),
        }
    }
}

/// Result of `can_grant_permissions`: valid, or invalid with a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantDecision {
    /// The grant may proceed.
    Valid,
    /// The grant is rejected.
    Invalid(GrantDenial),
}

impl GrantDecision {
    /// Whether the grant may proceed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Human-readable reason for a rejection.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid(denial) => Some(denial.to_string()),
        }
    }

    /// Convert into a result carrying the matching error kind.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(denial) => Err(denial.into()),
        }
    }
}
