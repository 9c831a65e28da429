//! Unified application error types for Ledgerdesk.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Authorization decisions themselves
//! never produce errors; only rejected grants, edits and store failures do.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The acting user lacks the rights for the requested grant or edit.
    PermissionDenied,
    /// The target role is above the acting user's assignment ceiling.
    InvalidRoleAssignment,
    /// An entity id lies outside the acting user's managed scope.
    ScopeViolation,
    /// The mutation would break a data invariant (last manager removal,
    /// an employee managing entities).
    InvariantViolation,
    /// The acting user could not be identified.
    Authentication,
    /// The requested record was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A conflicting record already exists.
    Conflict,
    /// Reading or writing a data file failed.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Return the machine-readable code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidRoleAssignment => "INVALID_ROLE_ASSIGNMENT",
            Self::ScopeViolation => "SCOPE_VIOLATION",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::Authentication => "AUTHENTICATION",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Storage => "STORAGE",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether this kind is a user-facing rejection rather than a system fault.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied
                | Self::InvalidRoleAssignment
                | Self::ScopeViolation
                | Self::InvariantViolation
                | Self::Authentication
                | Self::NotFound
                | Self::Validation
                | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout Ledgerdesk.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create an invalid-role-assignment error.
    pub fn invalid_role_assignment(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRoleAssignment, message)
    }

    /// Create a scope-violation error.
    pub fn scope_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ScopeViolation, message)
    }

    /// Create an invariant-violation error.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = AppError::scope_violation("entity 'E2' is outside your scope");
        assert_eq!(
            err.to_string(),
            "SCOPE_VIOLATION: entity 'E2' is outside your scope"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: AppError = io.into();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(!err.kind.is_rejection());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AppError::with_source(ErrorKind::Storage, "write failed", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.message, "write failed");
    }
}
