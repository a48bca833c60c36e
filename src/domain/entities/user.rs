//! User entity.

use chrono::{DateTime, Utc};

/// A registered account. `password` holds the bcrypt hash, never plaintext.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a user after email verification.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// bcrypt hash of the chosen password.
    pub password: String,
}

/// Partial profile update. Only names are mutable.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
