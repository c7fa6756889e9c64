//! Handlers for link management endpoints.
//!
//! All routes accept an optional bearer token. Ownership rules are applied by
//! [`crate::application::services::LinkService`].

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::link::{
    DeletedResponse, LinkListResponse, LinkResponse, LinkStatsResponse, ShortenRequest,
    UpdateTitleRequest,
};
use crate::api::middleware::Caller;
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::public_base_url;

fn base_url(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    public_base_url(
        state.settings.base_url.as_deref(),
        headers,
        state.settings.behind_proxy,
    )
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/urls/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/page",
///   "custom_code": "promo",              // optional, "" = absent
///   "title": "Spring campaign",          // optional
///   "expires_at": "2030-01-01T00:00:00Z" // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the link and its `short_url`. Authenticated callers own
/// the new link; anonymous links have no owner.
///
/// # Errors
///
/// - `400` `invalid_url` / `validation_error`
/// - `409` `code_taken`
/// - `503` `code_space_exhausted`
pub async fn shorten_handler(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let base_url = base_url(&state, &headers)?;

    let link = state
        .link_service
        .create(CreateLink {
            original_url: payload.original_url,
            custom_code: payload.custom_code,
            title: payload.title,
            expires_at: payload.expires_at,
            owner_id: caller.owner_id(),
        })
        .await?;

    tracing::info!(link_id = link.id, code = %link.short_code, "Link created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(LinkResponse::from_link(link, &base_url)),
    ))
}

/// Lists the caller's active links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls/list`
///
/// Anonymous callers receive an empty list.
pub async fn list_links_handler(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
) -> Result<ApiResponse<LinkListResponse>, AppError> {
    let base_url = base_url(&state, &headers)?;
    let links = state.link_service.list_for_owner(caller.owner_id()).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &base_url))
        .collect();

    Ok(ApiResponse::ok(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Updates a link's title.
///
/// # Endpoint
///
/// `PUT /api/urls/{id}`
///
/// # Errors
///
/// - `400` for a non-numeric id or a blank or overlong title
/// - `404` if no active link with this id matches the caller
pub async fn update_link_handler(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTitleRequest>, JsonRejection>,
) -> Result<ApiResponse<LinkResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let base_url = base_url(&state, &headers)?;

    let link = state
        .link_service
        .update_title(id, &payload.title, caller.owner_id())
        .await?;

    Ok(ApiResponse::ok(LinkResponse::from_link(link, &base_url)))
}

/// Soft-deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// The short code stays reserved after deletion.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    let Path(id) = id?;
    state.link_service.delete(id, caller.owner_id()).await?;

    Ok(ApiResponse::ok(DeletedResponse { id, deleted: true }))
}

/// Returns click statistics for one link.
///
/// # Endpoint
///
/// `GET /api/urls/{id}/stats`
pub async fn link_stats_handler(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<LinkStatsResponse>, AppError> {
    let Path(id) = id?;
    let base_url = base_url(&state, &headers)?;
    let stats = state.link_service.stats(id, caller.owner_id()).await?;

    Ok(ApiResponse::ok(LinkStatsResponse::from_stats(
        stats, &base_url,
    )))
}
