//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the permission system.
///
/// Roles are ordered by privilege level: Geschaeftsfuehrer > Manager > Employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Managing director. Unrestricted access to every entity and module.
    Geschaeftsfuehrer,
    /// Scoped role; may invite and manage users within the entities it manages.
    Manager,
    /// Base role; only explicitly granted entities and modules.
    Employee,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Role; 3] = [Role::Geschaeftsfuehrer, Role::Manager, Role::Employee];

    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Geschaeftsfuehrer => 3,
            Self::Manager => 2,
            Self::Employee => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &Role) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role short-circuits every permission check.
    pub fn is_geschaeftsfuehrer(&self) -> bool {
        matches!(self, Self::Geschaeftsfuehrer)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geschaeftsfuehrer => "geschaeftsfuehrer",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Return the German display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Geschaeftsfuehrer => "Geschäftsführer",
            Self::Manager => "Manager",
            Self::Employee => "Mitarbeiter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ledgerdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geschaeftsfuehrer" | "geschäftsführer" => Ok(Self::Geschaeftsfuehrer),
            "manager" => Ok(Self::Manager),
            "employee" | "mitarbeiter" => Ok(Self::Employee),
            _ => Err(ledgerdesk_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: geschaeftsfuehrer, manager, employee"
            ))),
        }
    }
}
