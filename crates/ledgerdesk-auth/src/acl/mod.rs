//! The authorization engine: module checks with entity-scoped overrides,
//! user editing and grant validation.

pub mod checker;
pub mod grant;
pub mod resolver;

pub use checker::ModuleAccessChecker;
pub use grant::{GrantDecision, GrantDenial};
pub use resolver::{AuthorizationEngine, EffectivePermission, PermissionSource};
