//! Request and response types for registration and login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{AuthenticatedSession, RegisterInput};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Profile plus a fresh access token, returned by verify and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub access_token: String,
}

impl From<AuthenticatedSession> for AuthResponse {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            id: session.user.id,
            first_name: session.user.first_name,
            last_name: session.user.last_name,
            email: session.user.email,
            created_at: session.user.created_at,
            access_token: session.access_token,
        }
    }
}
