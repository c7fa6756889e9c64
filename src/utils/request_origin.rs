//! Public origin extraction from HTTP request headers.
//!
//! Used to build display-ready short URLs when no `BASE_URL` is configured.

use crate::AppError;
use axum::http::{HeaderMap, header};

/// Header set by reverse proxies carrying the client-facing scheme.
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Builds `{scheme}://{host}` for the current request.
///
/// The `Host` header is kept as sent, port included. The scheme is taken from
/// `X-Forwarded-Proto` only when `behind_proxy` is set (the header is client
/// controlled otherwise) and falls back to `http`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing
/// - The header value contains invalid UTF-8
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt:8080".parse().unwrap());
///
/// assert_eq!(request_origin(&headers, false).unwrap(), "http://sho.rt:8080");
/// ```
pub fn request_origin(headers: &HeaderMap, behind_proxy: bool) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request(
            "Missing Host header",
            serde_json::json!({}),
        ));
    }

    let scheme = behind_proxy
        .then(|| forwarded_proto(headers))
        .flatten()
        .unwrap_or("http");

    Ok(format!("{scheme}://{host}"))
}

/// First `http`/`https` value of `X-Forwarded-Proto`; proxies may send a list.
fn forwarded_proto(headers: &HeaderMap) -> Option<&'static str> {
    let value = headers.get(X_FORWARDED_PROTO)?.to_str().ok()?;
    match value.split(',').next()?.trim().to_ascii_lowercase().as_str() {
        "https" => Some("https"),
        "http" => Some("http"),
        _ => None,
    }
}

/// Picks the configured base URL, or derives one from the request.
pub fn public_base_url(
    configured: Option<&str>,
    headers: &HeaderMap,
    behind_proxy: bool,
) -> Result<String, AppError> {
    match configured {
        Some(base) => Ok(base.trim_end_matches('/').to_string()),
        None => request_origin(headers, behind_proxy),
    }
}
