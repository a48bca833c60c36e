//! Short URL management: creation, listing, owner-scoped update and delete.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{UrlListQuery, UrlRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{url_key, CacheService};
use crate::utils::token_generator::{validate_custom_alias, TokenGenerator};

/// How many fresh tokens to try when a generated token collides.
const MAX_TOKEN_ATTEMPTS: u32 = 3;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Input for creating a short URL.
#[derive(Debug, Clone)]
pub struct CreateUrlInput {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub max_clicks: Option<i64>,
    /// Lifetime in seconds, converted to an absolute expiry at creation.
    pub duration: Option<i64>,
}

/// Service for the short URL lifecycle.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    tokens: Arc<TokenGenerator>,
}

impl UrlService {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        tokens: Arc<TokenGenerator>,
    ) -> Self {
        Self {
            repository,
            cache,
            tokens,
        }
    }

    /// Creates a short URL for `user_id`.
    ///
    /// Custom aliases are used verbatim after validation; a taken alias is a
    /// `Conflict`. Generated tokens are retried with a fresh draw when they
    /// collide, up to [`MAX_TOKEN_ATTEMPTS`] times.
    pub async fn create(&self, user_id: i64, input: CreateUrlInput) -> Result<ShortUrl, AppError> {
        let parsed = url::Url::parse(&input.original_url)
            .map_err(|_| AppError::bad_request("Invalid URL format"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::bad_request("URL must use http or https"));
        }

        if input.max_clicks.is_some_and(|c| c <= 0) {
            return Err(AppError::bad_request("max_clicks must be positive"));
        }
        if input.duration.is_some_and(|d| d <= 0) {
            return Err(AppError::bad_request("duration must be positive"));
        }

        let expires_at = input.duration.map(|d| Utc::now() + Duration::seconds(d));

        if let Some(alias) = input.custom_alias {
            validate_custom_alias(&alias)?;
            return match self
                .repository
                .create(NewShortUrl {
                    user_id,
                    original_url: input.original_url,
                    short_token: alias,
                    max_clicks: input.max_clicks,
                    expires_at,
                })
                .await
            {
                Err(AppError::Conflict { .. }) => {
                    Err(AppError::conflict("This alias is already taken"))
                }
                other => other,
            };
        }

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = self.tokens.generate();
            match self
                .repository
                .create(NewShortUrl {
                    user_id,
                    original_url: input.original_url.clone(),
                    short_token: token,
                    max_clicks: input.max_clicks,
                    expires_at,
                })
                .await
            {
                Ok(created) => return Ok(created),
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, "generated token collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = MAX_TOKEN_ATTEMPTS,
            "exhausted token generation attempts"
        );
        Err(AppError::internal("Failed to generate a unique short token"))
    }

    /// Lists links with pagination defaults applied.
    pub async fn list(&self, mut query: UrlListQuery) -> Result<(Vec<ShortUrl>, i64), AppError> {
        if query.page < 1 {
            query.page = 1;
        }
        if query.limit < 1 {
            query.limit = DEFAULT_PAGE_SIZE;
        }
        query.limit = query.limit.min(MAX_PAGE_SIZE);

        self.repository.list(query).await
    }

    /// Applies an owner-scoped partial update and invalidates stale cache
    /// entries for the link's tokens.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<ShortUrl, AppError> {
        if let Some(token) = &patch.short_token {
            validate_custom_alias(token)?;
        }
        if patch.max_clicks.flatten().is_some_and(|c| c < 0) {
            return Err(AppError::bad_request("max_clicks cannot be negative"));
        }

        let existing = self
            .repository
            .find_by_id_for_owner(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        let updated = self
            .repository
            .update(id, user_id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        self.invalidate(&existing.short_token).await;
        if updated.short_token != existing.short_token {
            self.invalidate(&updated.short_token).await;
        }

        Ok(updated)
    }

    /// Deletes a link, scoped to the owner, and drops its cache entry.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        let existing = self
            .repository
            .find_by_id_for_owner(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        let deleted = self.repository.delete(id, user_id).await?;
        if !deleted {
            return Err(AppError::not_found("Short link not found"));
        }

        self.invalidate(&existing.short_token).await;
        Ok(())
    }

    async fn invalidate(&self, token: &str) {
        if let Err(e) = self.cache.delete(&url_key(token)).await {
            warn!(token, error = %e, "failed to invalidate cached URL");
        }
    }
}
