//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use ledgerdesk_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::PermissionDenied
        | ErrorKind::InvalidRoleAssignment
        | ErrorKind::ScopeViolation => StatusCode::FORBIDDEN,
        ErrorKind::InvariantViolation | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Storage
        | ErrorKind::Serialization
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);
        if status.is_server_error() {
            tracing::error!(error = %err, code = err.kind.as_str(), "Internal server error");
        }

        let body = ApiErrorResponse {
            error: err.kind.as_str().to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}
