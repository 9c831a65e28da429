//! Request DTOs with validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::permission::ModulePermissions;
use ledgerdesk_entity::user::Role;

/// Query of `GET /api/permissions/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckQuery {
    /// Module key.
    pub module: String,
    /// `view` or `edit`.
    pub action: String,
    /// Optional entity scope.
    pub entity: Option<String>,
}

/// Query carrying an optional entity scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityQuery {
    /// Optional entity scope.
    pub entity: Option<String>,
}

/// Body of `POST /api/permissions/grant-check`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GrantCheckRequest {
    /// Role to assign.
    pub role: Role,
    /// Entities the user may access.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Entities the user manages.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
}

/// Body of `POST /api/users/invite`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteUserRequest {
    /// Email of the invited user.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Display name.
    #[validate(length(max = 200))]
    #[serde(default)]
    pub name: String,
    /// Role to assign.
    pub role: Role,
    /// Entities the user may access.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Entities the user manages.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Global module flags.
    #[serde(default)]
    pub module_permissions: ModulePermissions,
}

/// Body of `PUT /api/users/{email}/permissions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditPermissionsRequest {
    /// Role to assign.
    pub role: Role,
    /// Entities the user may access.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Entities the user manages.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Global module flags.
    #[serde(default)]
    pub module_permissions: ModulePermissions,
}

/// Body of `POST /api/entities`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEntityRequest {
    /// Unique entity id.
    #[validate(length(min = 1, max = 64, message = "Entity id is required"))]
    pub id: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Entity name is required"))]
    pub name: String,
    /// Initial managers; defaults to the acting user.
    #[serde(default)]
    pub managers: Vec<String>,
}

/// Body of `POST /api/entities/{id}/managers`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddManagerRequest {
    /// Email of the new co-manager.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Body of `PUT /api/entities/{id}/permissions/{email}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntityOverrideRequest {
    /// Module flags that apply within the entity.
    #[serde(default)]
    pub permissions: ModulePermissions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_request_validation() {
        let req: InviteUserRequest = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "role": "employee"
        }))
        .unwrap();
        assert!(req.validate().is_err());

        let req: InviteUserRequest = serde_json::from_value(serde_json::json!({
            "email": "neu@firma.de",
            "role": "manager",
            "managedEntityIds": ["E1"],
            "modulePermissions": { "kosten": { "view": true } }
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.managed_entity_ids.len(), 1);
    }

    #[test]
    fn test_create_entity_requires_id() {
        let req = CreateEntityRequest {
            id: String::new(),
            name: "Alpha".to_string(),
            managers: vec![],
        };
        assert!(req.validate().is_err());
    }
}
