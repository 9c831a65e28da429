//! Entity creation and manager maintenance.

pub mod service;

pub use service::EntityService;
