//! Convenience result type alias for Ledgerdesk.

use crate::error::AppError;

/// A specialized `Result` type for Ledgerdesk operations.
pub type AppResult<T> = Result<T, AppError>;
