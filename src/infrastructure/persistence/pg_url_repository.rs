//! PostgreSQL implementation of the short URL repository.
//!
//! Queries use the runtime `sqlx::query_as` API with bound parameters;
//! optional filters are expressed as `($n IS NULL OR ...)` predicates so a
//! single prepared statement covers all filter combinations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::{UrlListQuery, UrlRepository};
use crate::error::AppError;

const SELECT_COLUMNS: &str = "id, user_id, original_url, short_token, max_clicks, expires_at, created_at";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    user_id: i64,
    original_url: String,
    short_token: String,
    max_clicks: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for ShortUrl {
    fn from(r: UrlRow) -> Self {
        ShortUrl {
            id: r.id,
            user_id: r.user_id,
            original_url: r.original_url,
            short_token: r.short_token,
            max_clicks: r.max_clicks,
            expires_at: r.expires_at,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for short URL storage and retrieval.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let sql = format!(
            "INSERT INTO urls (user_id, original_url, short_token, max_clicks, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SELECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(new_url.user_id)
            .bind(&new_url.original_url)
            .bind(&new_url.short_token)
            .bind(new_url.max_clicks)
            .bind(new_url.expires_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortUrl>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM urls WHERE short_token = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(token)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id_for_owner(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM urls WHERE id = $1 AND user_id = $2");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: UrlListQuery) -> Result<(Vec<ShortUrl>, i64), AppError> {
        let offset = (query.page - 1) * query.limit;
        let pattern = query.search.as_ref().map(|s| format!("%{s}%"));

        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM urls \
             WHERE ($1::bigint IS NULL OR user_id = $1) \
               AND ($2::text IS NULL OR original_url ILIKE $2 OR short_token ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(query.user_id)
            .bind(&pattern)
            .bind(query.limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM urls \
             WHERE ($1::bigint IS NULL OR user_id = $1) \
               AND ($2::text IS NULL OR original_url ILIKE $2 OR short_token ILIKE $2)",
        )
        .bind(query.user_id)
        .bind(&pattern)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), count))
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError> {
        // $4/$6 flag whether the tri-state fields were provided at all,
        // so "absent" leaves the column untouched while "null" clears it.
        let sql = format!(
            "UPDATE urls SET \
                short_token = COALESCE($3::varchar, short_token), \
                max_clicks = CASE WHEN $4 THEN $5::bigint ELSE max_clicks END, \
                expires_at = CASE WHEN $6 THEN $7::timestamptz ELSE expires_at END \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {SELECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(&patch.short_token)
            .bind(patch.max_clicks.is_some())
            .bind(patch.max_clicks.flatten())
            .bind(patch.expires_at.is_some())
            .bind(patch.expires_at.flatten())
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_click(&self, token: &str) -> Result<bool, AppError> {
        // Single conditional statement: concurrent redirects of a link with
        // one remaining click resolve to exactly one affected row.
        let result = sqlx::query(
            "UPDATE urls SET max_clicks = max_clicks - 1 \
             WHERE short_token = $1 AND max_clicks > 0",
        )
        .bind(token)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
