//! Route handlers organized by domain.

pub mod entity;
pub mod health;
pub mod permission;
pub mod user;
