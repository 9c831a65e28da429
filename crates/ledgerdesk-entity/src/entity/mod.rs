//! Legal entity records and the entity catalog.

pub mod catalog;
pub mod model;

pub use catalog::EntityCatalog;
pub use model::Entity;
