//! Application error type shared by services, repositories and handlers.
//!
//! Every variant maps to a stable machine-readable `code` and an HTTP status.
//! API handlers return errors wrapped in the standard
//! [`ApiResponse`](crate::api::dto::envelope::ApiResponse) envelope. The redirect
//! route never renders these as JSON; it maps outcomes to HTML pages instead
//! (see [`crate::web::pages`]).

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::api::dto::envelope::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request data failed validation at the boundary.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// `original_url` is not a well-formed http(s) URL.
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// A custom short code collides with an existing one.
    #[error("Short code '{code}' is already in use")]
    CodeTaken { code: String },

    /// The generator could not find a free code within its attempt budget.
    #[error("Could not find a free short code after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Target link is missing, deleted, or owned by someone else.
    ///
    /// Deliberately indistinguishable from a plain not-found on the wire.
    #[error("Link not found or access denied")]
    NotFoundOrForbidden { link_id: i64 },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable error kind reported in the `code` field of the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::CodeTaken { .. } => "code_taken",
            Self::Exhausted { .. } => "code_space_exhausted",
            Self::NotFound { .. } | Self::NotFoundOrForbidden { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Conflict { .. } => "conflict",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            Self::CodeTaken { .. } | Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Exhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } | Self::NotFoundOrForbidden { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Details safe to expose to clients. Only validation errors carry any.
    fn public_details(&self) -> Option<Value> {
        match self {
            Self::Validation { details, .. } if !details.is_null() => Some(details.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let Self::Internal { message, details } = &self {
            tracing::error!(%message, %details, "Request failed with internal error");
        }

        let body = ApiResponse::<()>::failure(self.code(), self.to_string(), self.public_details());

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "body": [rejection.body_text()] }),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(
            "Invalid path parameter",
            json!({ "path": [rejection.body_text()] }),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request("Validation failed", details)
    }
}
