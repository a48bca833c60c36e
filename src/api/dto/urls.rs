//! Request and response types for the short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreateUrlInput;
use crate::domain::entities::{ShortUrl, ShortUrlPatch};
use crate::domain::repositories::UrlListQuery;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(url(message = "original_url must be a valid URL"))]
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub max_clicks: Option<i64>,
    /// Lifetime in seconds.
    pub duration: Option<i64>,
}

impl From<CreateUrlRequest> for CreateUrlInput {
    fn from(req: CreateUrlRequest) -> Self {
        CreateUrlInput {
            original_url: req.original_url,
            custom_alias: req.custom_alias,
            max_clicks: req.max_clicks,
            duration: req.duration,
        }
    }
}

/// Partial update. `hashed_url` carries a replacement token; `max_clicks`
/// and `expires_at` distinguish "absent" (unchanged) from explicit `null`
/// (cleared).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUrlRequest {
    pub hashed_url: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub max_clicks: Option<Option<i64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateUrlRequest> for ShortUrlPatch {
    fn from(req: UpdateUrlRequest) -> Self {
        ShortUrlPatch {
            short_token: req.hashed_url,
            max_clicks: req.max_clicks,
            expires_at: req.expires_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsParams {
    pub user_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ListUrlsParams> for UrlListQuery {
    fn from(params: ListUrlsParams) -> Self {
        UrlListQuery {
            // A zero user_id means "no owner filter".
            user_id: params.user_id.filter(|&id| id > 0),
            search: params.search.filter(|s| !s.is_empty()),
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    /// The full short URL, ready to share.
    pub hashed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clicks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    pub fn from_entity(url: ShortUrl, base_url: &str) -> Self {
        Self {
            hashed_url: format!("{}/v1/urls/{}", base_url.trim_end_matches('/'), url.short_token),
            id: url.id,
            user_id: url.user_id,
            original_url: url.original_url,
            max_clicks: url.max_clicks,
            expires_at: url.expires_at,
            created_at: url.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlResponse>,
    pub count: i64,
}
