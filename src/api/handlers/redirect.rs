//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::services::Resolution;
use crate::domain::click_event::ClickEvent;
use crate::state::AppState;
use crate::web::pages::RedirectError;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code against the link store (no cache)
/// 2. Build the `Location` header from the target
/// 3. Submit a click event to the background worker without waiting
/// 4. Return `302 Found`
///
/// # Click Tracking
///
/// Clicks are counted only for successful resolutions. The counter update
/// runs after, or concurrently with, the response and never delays it.
///
/// # Errors
///
/// Always answers with HTML, never JSON:
/// - `404 Not Found` for unknown, malformed or deleted codes
/// - `410 Gone` for expired links
/// - `500 Internal Server Error` if the lookup fails or the stored target is
///   not a valid header value (no click is counted)
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    let resolution = match state.redirect_service.resolve(&code).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(%code, error = %e, "Redirect lookup failed");
            metrics::counter!("redirects_total", "outcome" => "error").increment(1);
            return RedirectError::Internal.into_response();
        }
    };

    match resolution {
        Resolution::Resolved {
            link_id,
            short_code,
            target,
        } => {
            let location = match HeaderValue::try_from(target) {
                Ok(location) => location,
                Err(e) => {
                    tracing::error!(%code, link_id, error = %e, "Stored target is not a valid Location");
                    metrics::counter!("redirects_total", "outcome" => "error").increment(1);
                    return RedirectError::Internal.into_response();
                }
            };

            metrics::counter!("redirects_total", "outcome" => "resolved").increment(1);
            state.click_queue.submit(ClickEvent::new(link_id, short_code));

            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Resolution::NotFound => {
            tracing::debug!(%code, "Short code not found");
            metrics::counter!("redirects_total", "outcome" => "not_found").increment(1);
            RedirectError::NotFound.into_response()
        }
        Resolution::Expired => {
            tracing::debug!(%code, "Short code expired");
            metrics::counter!("redirects_total", "outcome" => "expired").increment(1);
            RedirectError::Expired.into_response()
        }
    }
}
