//! Application builder: wires router, middleware and state into an Axum app.

use axum::{Router, middleware as axum_middleware};
use tower_http::trace::TraceLayer;

use ledgerdesk_core::config::AppConfig;
use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the Ledgerdesk server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Ledgerdesk server...");

    let addr = config.server.bind_address();
    let state = AppState::new(config).await?;
    tracing::info!(
        modules = state.engine.modules().len(),
        data_dir = %state.store.root().display(),
        "Services initialized"
    );

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Ledgerdesk server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Ledgerdesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
