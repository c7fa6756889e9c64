//! API route configuration.
//!
//! Link routes accept an optional bearer token; account routes are public
//! except `verify-token` and `profile`, which require one. Rate limiting is
//! applied by the caller in [`crate::routes`].

use crate::api::handlers::{
    delete_link_handler, forgot_password_handler, link_stats_handler, list_links_handler,
    login_handler, profile_handler, register_handler, reset_password_handler, shorten_handler,
    update_link_handler, verify_token_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST   /urls/shorten`    - Create a short link
/// - `GET    /urls/list`       - List the caller's links
/// - `PUT    /urls/{id}`       - Update a link's title
/// - `DELETE /urls/{id}`       - Soft-delete a link
/// - `GET    /urls/{id}/stats` - Click statistics for a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/urls/shorten", post(shorten_handler))
        .route("/urls/list", get(list_links_handler))
        .route(
            "/urls/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route("/urls/{id}/stats", get(link_stats_handler))
}

/// Account routes.
///
/// # Endpoints
///
/// - `POST /auth/register`
/// - `POST /auth/login`
/// - `POST /auth/forgot-password`
/// - `POST /auth/reset-password`
/// - `GET  /auth/verify-token` (bearer required)
/// - `GET  /auth/profile` (bearer required)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/forgot-password", post(forgot_password_handler))
        .route("/auth/reset-password", post(reset_password_handler))
        .route("/auth/verify-token", get(verify_token_handler))
        .route("/auth/profile", get(profile_handler))
}
