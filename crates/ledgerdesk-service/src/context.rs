//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::user::{User, normalize_email};
use ledgerdesk_store::DataState;

/// Context for the current request.
///
/// Built by the API or CLI layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Normalized email of the acting user.
    pub actor_email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor_email: &str) -> Self {
        Self {
            actor_email: normalize_email(actor_email),
            request_time: Utc::now(),
        }
    }

    /// Resolves the acting user from a snapshot.
    pub fn actor(&self, state: &DataState) -> AppResult<User> {
        state.user(&self.actor_email).ok_or_else(|| {
            AppError::authentication(format!("Unknown user '{}'", self.actor_email))
        })
    }

    /// Logs a rejected mutation attempted by the acting user.
    pub fn log_rejection(&self, operation: &str, err: &AppError) {
        if err.kind.is_rejection() {
            warn!(
                actor = %self.actor_email,
                operation,
                code = err.kind.as_str(),
                "Rejected: {}",
                err.message
            );
        }
    }
}
