//! # ledgerdesk-entity
//!
//! Domain models for Ledgerdesk. Every struct in this crate is either a
//! persisted record (user profile, legal entity, permission document) or a
//! value object assembled from them (a [`user::User`] with its resolved
//! permission set). Records use the camelCase field names of the JSON
//! data files.

pub mod entity;
pub mod permission;
pub mod user;

/// Identifier of a legal entity.
pub type EntityId = String;
