//! User listing, invitation and permission edit handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use ledgerdesk_auth::GrantRequest;
use ledgerdesk_entity::user::User;
use ledgerdesk_service::InviteRequest;

use crate::dto::request::{EditPermissionsRequest, InviteUserRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ActingUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    actor: ActingUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.user_service.list_visible(&actor).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{email}
pub async fn get_user(
    State(state): State<AppState>,
    actor: ActingUser,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.get(&actor, &email).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users/invite
pub async fn invite_user(
    State(state): State<AppState>,
    actor: ActingUser,
    ValidatedJson(req): ValidatedJson<InviteUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = state
        .permission_service
        .invite(
            &actor,
            InviteRequest {
                email: req.email,
                name: req.name,
                role: req.role,
                accessible_entity_ids: req.accessible_entity_ids,
                managed_entity_ids: req.managed_entity_ids,
                module_permissions: req.module_permissions,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PUT /api/users/{email}/permissions
pub async fn edit_permissions(
    State(state): State<AppState>,
    actor: ActingUser,
    Path(email): Path<String>,
    ValidatedJson(req): ValidatedJson<EditPermissionsRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .permission_service
        .edit_permissions(
            &actor,
            GrantRequest {
                target_email: email,
                role: req.role,
                accessible_entity_ids: req.accessible_entity_ids,
                managed_entity_ids: req.managed_entity_ids,
                module_permissions: req.module_permissions,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
