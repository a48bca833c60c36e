//! Request and response types for the user endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{User, UserPatch};
use crate::domain::repositories::UserListQuery;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub last_name: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ListUsersParams> for UserListQuery {
    fn from(params: ListUsersParams) -> Self {
        UserListQuery {
            search: params.search.filter(|s| !s.is_empty()),
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(0),
        }
    }
}

/// Public user representation. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub count: i64,
}
