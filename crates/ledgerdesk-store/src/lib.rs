//! # ledgerdesk-store
//!
//! Flat-file persistence for Ledgerdesk. Users, entities and the permission
//! document each live in one JSON file. Every mutation is a single
//! read-modify-write under a store-wide lock. Changed files are first written
//! to temporary siblings and only renamed over their targets once every
//! staged write succeeded.

pub mod document;
pub mod state;
pub mod store;

pub use document::{JsonDocument, StagedFile};
pub use state::DataState;
pub use store::DataStore;
