//! Entity and manager handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use ledgerdesk_entity::entity::Entity;

use crate::dto::request::{AddManagerRequest, CreateEntityRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ActingUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/entities
pub async fn list_entities(
    State(state): State<AppState>,
    actor: ActingUser,
) -> Result<Json<ApiResponse<Vec<Entity>>>, ApiError> {
    let entities = state.entity_service.list_assignable(&actor).await?;
    Ok(Json(ApiResponse::ok(entities)))
}

/// POST /api/entities
pub async fn create_entity(
    State(state): State<AppState>,
    actor: ActingUser,
    ValidatedJson(req): ValidatedJson<CreateEntityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Entity>>), ApiError> {
    let entity = state
        .entity_service
        .create(&actor, &req.id, &req.name, req.managers)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entity))))
}

/// POST /api/entities/{id}/managers
pub async fn add_manager(
    State(state): State<AppState>,
    actor: ActingUser,
    Path(entity_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddManagerRequest>,
) -> Result<Json<ApiResponse<Entity>>, ApiError> {
    let entity = state
        .entity_service
        .add_manager(&actor, &entity_id, &req.email)
        .await?;
    Ok(Json(ApiResponse::ok(entity)))
}

/// DELETE /api/entities/{id}/managers/{email}
pub async fn remove_manager(
    State(state): State<AppState>,
    actor: ActingUser,
    Path((entity_id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Entity>>, ApiError> {
    let entity = state
        .entity_service
        .remove_manager(&actor, &entity_id, &email)
        .await?;
    Ok(Json(ApiResponse::ok(entity)))
}
