//! Role hierarchy and assignment ceilings.

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::RolePolicies;
