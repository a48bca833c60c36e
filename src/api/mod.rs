//! HTTP API: routing, handlers, DTOs, and the auth extractor.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
