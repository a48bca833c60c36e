//! Redirect resolution: cache fast path, state checks, click accounting.
//!
//! Every deny — unknown token, expired link, exhausted budget, lost
//! decrement race — is reported as the same `NotFound`, so probing the
//! redirect endpoint reveals nothing about which links exist.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::UrlState;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{url_key, CacheService};

/// Default TTL for cached redirect targets, in seconds.
const CACHE_TTL_SECONDS: u64 = 3600;

/// Resolves short tokens to their destinations, enforcing expiry and click
/// budgets on every hit.
pub struct RedirectService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
}

impl RedirectService {
    pub fn new(repository: Arc<dyn UrlRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Resolves `token` to the original URL, consuming one click if the link
    /// carries a budget.
    ///
    /// Only unlimited links are ever cached, so a cache hit never bypasses
    /// click accounting.
    pub async fn resolve(&self, token: &str) -> Result<String, AppError> {
        let key = url_key(token);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(token, "redirect served from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(token, error = %e, "cache lookup failed, falling back to database"),
        }

        let link = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        let now = Utc::now();
        match link.state_at(now) {
            UrlState::Active => {}
            UrlState::ExpiredByTime | UrlState::ExhaustedByClicks => {
                return Err(AppError::not_found("Short link not found"));
            }
        }

        if link.max_clicks.is_some() {
            // The conditional decrement is the arbiter under concurrency: a
            // losing racer sees no row updated and is denied.
            let consumed = self.repository.decrement_click(token).await?;
            if !consumed {
                return Err(AppError::not_found("Short link not found"));
            }
        } else {
            // TTL never outlives the expiry; a link whose remaining time
            // can't be established is not cached at all. The populate is
            // awaited inline so an owner's later invalidation cannot be
            // overwritten by a straggling write.
            let ttl = if link.expires_at.is_some() {
                link.seconds_until_expiry(now)
            } else {
                Some(CACHE_TTL_SECONDS)
            };
            if let Some(ttl) = ttl {
                let ttl = ttl.min(CACHE_TTL_SECONDS);
                if let Err(e) = self.cache.set(&key, &link.original_url, ttl).await {
                    debug!(token, error = %e, "failed to cache redirect target");
                }
            }
        }

        Ok(link.original_url)
    }
}
