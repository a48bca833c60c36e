//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::{UserListQuery, UserRepository};
use crate::error::AppError;

const SELECT_COLUMNS: &str = "id, first_name, last_name, email, password, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password: r.password,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email, password) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SELECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM users WHERE email = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: UserListQuery) -> Result<(Vec<User>, i64), AppError> {
        let offset = (query.page - 1) * query.limit;
        let pattern = query.search.as_ref().map(|s| format!("%{s}%"));

        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM users \
             WHERE ($1::text IS NULL \
                    OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&pattern)
            .bind(query.limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE ($1::text IS NULL \
                    OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), count))
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET \
                first_name = COALESCE($2::varchar, first_name), \
                last_name = COALESCE($3::varchar, last_name) \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(&patch.first_name)
            .bind(&patch.last_name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
