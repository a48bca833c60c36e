//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Listing parameters for [`UrlRepository::list`].
///
/// `user_id: None` lists globally; `search` matches case-insensitive
/// substrings of both the original URL and the short token.
#[derive(Debug, Clone, Default)]
pub struct UrlListQuery {
    pub user_id: Option<i64>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

/// Repository interface for short URL storage.
///
/// Ownership checks are part of the query predicates, never a separate
/// fetch-then-compare step, so cross-owner probes cannot distinguish
/// "absent" from "not yours".
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new short URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short token already exists;
    /// the caller regenerates the token and retries.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a link by its short token.
    async fn find_by_token(&self, token: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds a link by id, scoped to its owner.
    ///
    /// Returns `Ok(None)` both when the id is absent and when it belongs to
    /// another user.
    async fn find_by_id_for_owner(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Lists links with offset pagination, returning the page and the total
    /// count matching the filter.
    async fn list(&self, query: UrlListQuery) -> Result<(Vec<ShortUrl>, i64), AppError>;

    /// Applies a partial update, scoped to the owner.
    ///
    /// Returns `Ok(None)` when no row matches `(id, user_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when a new token collides with an
    /// existing link.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Hard-deletes a link, scoped to the owner.
    ///
    /// Returns `Ok(false)` when no row matches `(id, user_id)`.
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Atomically consumes one click from the link's budget.
    ///
    /// Must be a single conditional store operation, not read-then-write:
    /// concurrent redirects of a link with one remaining click see exactly
    /// one `true` here. Returns `false` when the token is absent or the
    /// budget is already zero.
    async fn decrement_click(&self, token: &str) -> Result<bool, AppError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
