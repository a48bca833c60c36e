//! Domain layer: entities, repository traits, and background jobs.

pub mod email_job;
pub mod email_worker;
pub mod entities;
pub mod repositories;
