//! `ActingUser` extractor: reads the acting user's email from the request.
//!
//! Session handling lives in front of this service; the fronting layer
//! forwards the authenticated email in the `X-User-Email` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use ledgerdesk_core::error::AppError;
use ledgerdesk_service::RequestContext;

use crate::error::ApiError;

/// Header carrying the acting user's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The acting user's request context.
#[derive(Debug, Clone)]
pub struct ActingUser(pub RequestContext);

impl std::ops::Deref for ActingUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::authentication("Missing X-User-Email header"))?;

        Ok(ActingUser(RequestContext::new(email)))
    }
}
