//! Application services orchestrating domain logic over the repositories.

mod auth_service;
mod redirect_service;
mod url_service;
mod user_service;

pub use auth_service::{AuthService, AuthenticatedSession, RegisterInput};
pub use redirect_service::RedirectService;
pub use url_service::{CreateUrlInput, UrlService};
pub use user_service::UserService;
