//! No-op cache used when Redis is not configured.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;

/// Cache implementation that stores nothing.
///
/// Every lookup is a miss, so redirects always hit the database. Writes
/// report failure: flows that need their entries to actually persist, like
/// registration staging, surface the missing backend instead of silently
/// dropping state. Used as a fallback so redirects keep working without
/// Redis.
#[derive(Debug, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str, _ttl_seconds: u64) -> CacheResult<()> {
        Err(CacheError::OperationError(format!(
            "caching disabled, cannot store {key}"
        )))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
