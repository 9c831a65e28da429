//! Response DTOs.

use serde::{Deserialize, Serialize};

use ledgerdesk_auth::acl::PermissionSource;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Data store status.
    pub store: String,
}

/// Result of a module check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether access is granted.
    pub allowed: bool,
    /// Rule that decided the check.
    pub source: PermissionSource,
}

/// Result of a grant dry-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantCheckResponse {
    /// Whether the grant may proceed.
    pub valid: bool,
    /// Why the grant was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}
