//! Infrastructure layer: database, cache, and external integrations.

pub mod cache;
pub mod email;
pub mod persistence;
