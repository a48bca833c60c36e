//! Shared utilities.

pub mod jwt;
pub mod token_generator;
