//! Short URL management endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::dto::auth::MessageResponse;
use crate::api::dto::urls::{
    CreateUrlRequest, ListUrlsParams, UpdateUrlRequest, UrlListResponse, UrlResponse,
};
use crate::api::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /v1/urls/make-short-url`
pub async fn create_url(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let created = state
        .url_service
        .create(caller.user_id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_entity(created, &state.config.base_url)),
    ))
}

/// `GET /v1/urls?user_id=&search=&page=&limit=`
pub async fn list_urls(
    State(state): State<AppState>,
    Query(params): Query<ListUrlsParams>,
) -> Result<Json<UrlListResponse>, AppError> {
    let (urls, count) = state.url_service.list(params.into()).await?;

    Ok(Json(UrlListResponse {
        urls: urls
            .into_iter()
            .map(|u| UrlResponse::from_entity(u, &state.config.base_url))
            .collect(),
        count,
    }))
}

/// `PUT /v1/urls/{id}`
pub async fn update_url(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    let updated = state
        .url_service
        .update(id, caller.user_id, payload.into())
        .await?;

    Ok(Json(UrlResponse::from_entity(
        updated,
        &state.config.base_url,
    )))
}

/// `DELETE /v1/urls/{id}`
pub async fn delete_url(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.url_service.delete(id, caller.user_id).await?;
    Ok(Json(MessageResponse::new("success")))
}
