pub mod auth;
pub mod health;
pub mod redirect;
pub mod urls;
pub mod users;
