//! Versioned API router.

use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers::{auth, redirect, urls, users};
use crate::state::AppState;

/// Builds the `/v1` router.
///
/// `/urls/{id}` serves both the public redirect (GET, token in the path)
/// and the authenticated update/delete (PUT/DELETE, numeric id); the
/// handlers extract the path parameter with the type they need.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify", post(auth::verify))
        .route("/auth/login", post(auth::login))
        .route("/urls", get(urls::list_urls))
        .route("/urls/make-short-url", post(urls::create_url))
        .route(
            "/urls/{id}",
            get(redirect::redirect)
                .put(urls::update_url)
                .delete(urls::delete_url),
        )
        .route("/users", get(users::list_users))
        .route("/users/email/{email}", get(users::get_user_by_email))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
