//! User domain entities.

pub mod model;
pub mod role;

pub use model::{User, UserProfile, normalize_email};
pub use role::Role;
