//! The redirect endpoint.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// `GET /v1/urls/{token}` — resolves the token and issues a 302.
///
/// Unknown, expired, and exhausted tokens all answer 404.
pub async fn redirect(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.redirect_service.resolve(&token).await?;
    info!(token = %token, "redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]))
}
