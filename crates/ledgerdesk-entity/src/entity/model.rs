//! Legal entity model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::EntityId;
use crate::user::normalize_email;

/// A legal or business unit with its own manager(s) and permission scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Manager emails in the order they were added. Co-management is allowed.
    #[serde(default, deserialize_with = "deserialize_managers")]
    pub managers: Vec<String>,
}

impl Entity {
    /// Create an entity.
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, managers: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            managers: normalize_managers(managers),
        }
    }

    /// Whether `email` is one of this entity's managers.
    pub fn is_managed_by(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.managers.iter().any(|m| *m == email)
    }

    /// Whether removing one manager would leave the entity without any.
    pub fn has_single_manager(&self) -> bool {
        self.managers.len() <= 1
    }
}

/// Trimmed, lowercased manager emails without blanks or duplicates.
fn normalize_managers(managers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(managers.len());
    for manager in managers.iter().map(|m| normalize_email(m)) {
        if !manager.is_empty() && !out.contains(&manager) {
            out.push(manager);
        }
    }
    out
}

fn deserialize_managers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(normalize_managers)
}
