//! Permission checks, invitations and edits.

pub mod service;

pub use service::{InviteRequest, MyPermissions, PermissionService};
