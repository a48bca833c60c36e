//! Repository traits implemented by the infrastructure layer.

mod url_repository;
mod user_repository;

pub use url_repository::{UrlListQuery, UrlRepository};
pub use user_repository::{UserListQuery, UserRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
