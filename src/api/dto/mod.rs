//! Request/response DTOs for the HTTP API.

pub mod auth;
pub mod health;
pub mod urls;
pub mod users;
