//! Permission check and override handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use ledgerdesk_service::MyPermissions;

use crate::dto::request::{CheckQuery, EntityOverrideRequest, EntityQuery, GrantCheckRequest};
use crate::dto::response::{ApiResponse, CheckResponse, GrantCheckResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{ActingUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/permissions/check?module=&action=&entity=
pub async fn check(
    State(state): State<AppState>,
    actor: ActingUser,
    Query(query): Query<CheckQuery>,
) -> Result<Json<ApiResponse<CheckResponse>>, ApiError> {
    let resolved = state
        .permission_service
        .check(&actor, &query.module, &query.action, query.entity.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(CheckResponse {
        allowed: resolved.granted,
        source: resolved.source,
    })))
}

/// POST /api/permissions/grant-check
pub async fn grant_check(
    State(state): State<AppState>,
    actor: ActingUser,
    ValidatedJson(req): ValidatedJson<GrantCheckRequest>,
) -> Result<Json<ApiResponse<GrantCheckResponse>>, ApiError> {
    let decision = state
        .permission_service
        .grant_check(&actor, req.role, &req.accessible_entity_ids, &req.managed_entity_ids)
        .await?;
    Ok(Json(ApiResponse::ok(GrantCheckResponse {
        valid: decision.is_valid(),
        reason: decision.reason(),
    })))
}

/// GET /api/me/permissions?entity=
pub async fn my_permissions(
    State(state): State<AppState>,
    actor: ActingUser,
    Query(query): Query<EntityQuery>,
) -> Result<Json<ApiResponse<MyPermissions>>, ApiError> {
    let mine = state
        .permission_service
        .my_permissions(&actor, query.entity.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(mine)))
}

/// PUT /api/entities/{id}/permissions/{email}
pub async fn set_override(
    State(state): State<AppState>,
    actor: ActingUser,
    Path((entity_id, email)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<EntityOverrideRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .permission_service
        .set_entity_override(&actor, &entity_id, &email, req.permissions)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Override saved".to_string(),
    })))
}

/// DELETE /api/entities/{id}/permissions/{email}
pub async fn remove_override(
    State(state): State<AppState>,
    actor: ActingUser,
    Path((entity_id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .permission_service
        .remove_entity_override(&actor, &entity_id, &email)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Override removed".to_string(),
    })))
}
