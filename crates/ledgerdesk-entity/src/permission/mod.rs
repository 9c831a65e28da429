//! Module catalog, view/edit actions and permission records.

pub mod action;
pub mod model;
pub mod module;

pub use action::Action;
pub use model::{
    EntityOverride, EntityPermissions, ModulePermission, ModulePermissions, PermissionDocument,
    PermissionSet,
};
pub use module::{Module, ModuleCatalog};
