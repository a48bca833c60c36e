//! Registration and login endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, VerifyRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// `POST /v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    payload.validate()?;

    state.auth_service.register(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Verification code sent to your email",
        )),
    ))
}

/// `POST /v1/auth/verify`
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .verify(&payload.email, &payload.code)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// `POST /v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}
