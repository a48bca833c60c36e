//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_auth::AuthBearer;

use crate::error::AppError;
use crate::state::AppState;

/// The verified caller of an authenticated endpoint.
///
/// Extracting this in a handler makes the endpoint require a valid bearer
/// token; public endpoints simply don't ask for it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthBearer(token) = AuthBearer::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::unauthorized("Missing bearer token"))?;

        let claims = state.jwt.verify(&token)?;
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}
