//! Repository trait for user account data access.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Listing parameters for [`UserRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

/// Repository interface for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a verified user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists users with offset pagination; `search` matches name and email
    /// substrings case-insensitively.
    async fn list(&self, query: UserListQuery) -> Result<(Vec<User>, i64), AppError>;

    /// Updates profile fields. Returns `Ok(None)` when the id is absent.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError>;

    /// Hard-deletes a user. Returns `Ok(false)` when the id is absent.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
