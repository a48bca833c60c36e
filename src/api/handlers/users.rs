//! User account endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use validator::Validate;

use crate::api::dto::auth::MessageResponse;
use crate::api::dto::users::{
    ListUsersParams, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::api::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /v1/users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get(id).await?;
    Ok(Json(user.into()))
}

/// `GET /v1/users/email/{email}`
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_by_email(&email).await?;
    Ok(Json(user.into()))
}

/// `GET /v1/users?search=&page=&limit=`
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let (users, count) = state.user_service.list(params.into()).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        count,
    }))
}

/// `PUT /v1/users/{id}` — self only.
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .user_service
        .update_profile(caller.user_id, id, payload.into())
        .await?;

    Ok(Json(updated.into()))
}

/// `DELETE /v1/users/{id}` — self only.
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.user_service.delete_account(caller.user_id, id).await?;
    Ok(Json(MessageResponse::new("success")))
}
