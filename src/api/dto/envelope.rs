//! Standard response envelope for every `/api` route.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// `{ success, data?, error?, code?, details? }`
///
/// Successful responses carry `data`; failures carry `error` (human-readable),
/// `code` (stable error kind) and, for validation failures, `details`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            details: None,
        }
    }

    pub fn failure(code: &'static str, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code),
            details,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_omits_error_fields() {
        let value = serde_json::to_value(ApiResponse::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(value, json!({ "success": true, "data": { "id": 1 } }));
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let value =
            serde_json::to_value(ApiResponse::<()>::failure("not_found", "Missing", None)).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "Missing", "code": "not_found" })
        );
    }
}
