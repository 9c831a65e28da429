//! # ledgerdesk-auth
//!
//! Authorization for the Ledgerdesk back office. Everything in this crate is
//! a pure decision over in-memory snapshots; nothing here performs I/O.
//!
//! ## Modules
//!
//! - `rbac`: the role hierarchy and per-role assignment ceilings
//! - `acl`: the authorization engine (module checks with entity overrides,
//!   user editing, grant validation, permission set construction)
//! - `workflow`: validated construction of permission sets and manager lists
//! - `display`: presentation projections of the engine's decisions

pub mod acl;
pub mod display;
pub mod rbac;
pub mod workflow;

pub use acl::{AuthorizationEngine, EffectivePermission, GrantDecision, GrantDenial};
pub use rbac::{RbacEnforcer, RolePolicies};
pub use workflow::{GrantRequest, PermissionWorkflow};
