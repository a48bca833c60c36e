//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache with per-entry TTLs.
///
/// Serves two purposes: the redirect hot path (token -> original URL) and
/// the short-lived registration state (pending users, verification codes).
/// The cache is never authoritative for click-budget correctness; on the
/// redirect path it is a read-through accelerator only, and reads fail open
/// so a cache outage degrades to database lookups. Writes report backend
/// failures, because the registration flow depends on its entries being
/// stored; the redirect populate treats such failures as best-effort.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a value.
    ///
    /// Returns `Ok(None)` on a miss; production implementations also treat
    /// backend errors as misses (fail-open) after logging them.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with a TTL in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot persist the entry. Callers
    /// for whom the entry is load-bearing (registration staging) propagate
    /// it; best-effort callers (redirect populate) log and continue.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes a key. Used when a link is updated or deleted.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Cache key for a short token's original URL.
pub fn url_key(token: &str) -> String {
    format!("url:{token}")
}

/// Cache key for a pending (unverified) registration.
pub fn pending_user_key(email: &str) -> String {
    format!("register:user:{email}")
}

/// Cache key for a registration verification code.
pub fn verification_code_key(email: &str) -> String {
    format!("register:code:{email}")
}
