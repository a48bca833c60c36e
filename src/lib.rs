//! URL shortener with user accounts, click budgets, and link expiry.
//!
//! The crate is layered: `domain` holds entities and repository traits,
//! `application` the services, `infrastructure` the PostgreSQL, Redis, and
//! email integrations, and `api` the Axum surface.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;
