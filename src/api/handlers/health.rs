//! Component health endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// `GET /health`
///
/// Reports per-component status. The service is considered up as long as
/// the database answers; a cache outage only degrades the response.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = match state.url_repository.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "database health check failed");
            false
        }
    };
    let cache_up = state.cache.health_check().await;
    let email_queue_up = !state.email_queue.is_closed();

    let (status_code, status) = if database_up {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            database: if database_up { "up" } else { "down" },
            cache: if cache_up { "up" } else { "down" },
            email_queue: if email_queue_up { "up" } else { "down" },
        }),
    )
}
