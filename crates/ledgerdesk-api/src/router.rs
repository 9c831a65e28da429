//! Route definitions for the Ledgerdesk HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router and thread `state` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(permission_routes())
        .merge(user_routes())
        .merge(entity_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Module checks, grant dry-runs and the caller's own permissions
fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/permissions/check", get(handlers::permission::check))
        .route(
            "/permissions/grant-check",
            post(handlers::permission::grant_check),
        )
        .route("/me/permissions", get(handlers::permission::my_permissions))
}

/// User listing, invitations and permission edits
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/invite", post(handlers::user::invite_user))
        .route("/users/{email}", get(handlers::user::get_user))
        .route(
            "/users/{email}/permissions",
            put(handlers::user::edit_permissions),
        )
}

/// Entities, co-managers and entity-scoped overrides
fn entity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entities",
            get(handlers::entity::list_entities).post(handlers::entity::create_entity),
        )
        .route("/entities/{id}/managers", post(handlers::entity::add_manager))
        .route(
            "/entities/{id}/managers/{email}",
            delete(handlers::entity::remove_manager),
        )
        .route(
            "/entities/{id}/permissions/{email}",
            put(handlers::permission::set_override).delete(handlers::permission::remove_override),
        )
}
