//! User listing and owner bootstrap.

pub mod service;

pub use service::UserService;
