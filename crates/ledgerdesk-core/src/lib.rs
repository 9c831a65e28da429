//! # ledgerdesk-core
//!
//! Core crate for Ledgerdesk. Contains the configuration schemas (server,
//! flat-file store, logging, module catalog) and the unified error system.
//!
//! This crate has **no** internal dependencies on other Ledgerdesk crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
