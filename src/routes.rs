//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public, HTML errors)
//! - `GET  /health`      - Health check: DB, click queue (public)
//! - `/api/urls/*`       - Link management (optional bearer token)
//! - `/api/auth/*`       - Accounts
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`, stricter for `/api/auth`
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{auth_routes, link_routes};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes without state or outer middleware.
pub fn app_routes() -> Router<AppState> {
    let api_router = Router::new()
        .merge(link_routes().layer(rate_limit::layer()))
        .merge(auth_routes().layer(rate_limit::secure_layer()));

    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
}

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the socket peer address, so the returned service must
/// be served with connect info (see [`crate::server::run`]).
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = app_routes().with_state(state).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
