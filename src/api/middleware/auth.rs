//! Bearer token extractors.
//!
//! Tokens are read from the `Authorization: Bearer <token>` header and verified
//! by the account service's identity provider.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::identity::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Optional caller identity.
///
/// A missing, malformed, expired or otherwise invalid token yields an anonymous
/// caller; this extractor never rejects a request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(caller: Caller) -> impl IntoResponse {
///     match caller.owner_id() { Some(id) => ..., None => ... }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub identity: Option<Identity>,
}

impl Caller {
    pub fn owner_id(&self) -> Option<i64> {
        self.identity.as_ref().map(|identity| identity.account_id)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await else {
            return Ok(Caller::default());
        };

        let identity = match state.account_service.identify(&token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
                None
            }
        };

        Ok(Caller { identity })
    }
}

/// Required caller identity; rejects with `401 Unauthorized`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Authorization header is missing or invalid"}),
                )
            })?;

        state.account_service.identify(&token).map(Authenticated)
    }
}
