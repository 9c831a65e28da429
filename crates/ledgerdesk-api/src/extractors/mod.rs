//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::ActingUser;
pub use json::ValidatedJson;
