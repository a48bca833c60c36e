//! User account lookup and self-service profile management.

use std::sync::Arc;

use crate::domain::entities::{User, UserPatch};
use crate::domain::repositories::{UserListQuery, UserRepository};
use crate::error::AppError;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Service for user account reads and self-scoped mutations.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list(&self, mut query: UserListQuery) -> Result<(Vec<User>, i64), AppError> {
        if query.page < 1 {
            query.page = 1;
        }
        if query.limit < 1 {
            query.limit = DEFAULT_PAGE_SIZE;
        }
        query.limit = query.limit.min(MAX_PAGE_SIZE);

        self.repository.list(query).await
    }

    /// Updates profile names. Callers can only update their own account; a
    /// mismatched id reads the same as a missing one.
    pub async fn update_profile(
        &self,
        caller_id: i64,
        target_id: i64,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        if caller_id != target_id {
            return Err(AppError::not_found("User not found"));
        }

        self.repository
            .update(target_id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Deletes the caller's own account.
    pub async fn delete_account(&self, caller_id: i64, target_id: i64) -> Result<(), AppError> {
        if caller_id != target_id {
            return Err(AppError::not_found("User not found"));
        }

        let deleted = self.repository.delete(target_id).await?;
        if !deleted {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }
}
