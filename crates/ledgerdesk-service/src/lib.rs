//! # ledgerdesk-service
//!
//! Use-case services for Ledgerdesk. Each service loads a snapshot from the
//! store, asks the authorization engine or workflow for a decision and
//! persists the result within the same store transaction.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod context;
pub mod entity;
pub mod permission;
pub mod user;

pub use context::RequestContext;
pub use entity::EntityService;
pub use permission::{InviteRequest, MyPermissions, PermissionService};
pub use user::UserService;
