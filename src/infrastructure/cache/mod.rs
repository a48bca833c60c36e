//! Cache layer: trait, Redis implementation, and no-op fallback.

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{
    pending_user_key, url_key, verification_code_key, CacheError, CacheResult, CacheService,
};

#[cfg(test)]
pub use service::MockCacheService;
