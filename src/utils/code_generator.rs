//! Short code generation and validation utilities.
//!
//! Generated codes are 8 characters of URL-safe base64 (`A-Z a-z 0-9 - _`).
//! Custom codes share the same alphabet so that every stored code is routable.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Random bytes drawn per code; 6 bytes encode to exactly 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 8;

/// Upper bound on custom code length.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 50;

/// Path segments taken by other routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Generates a random short code from OS entropy.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Returns true if every character belongs to the short code alphabet.
///
/// Used by the redirect path to reject garbage without touching storage.
pub fn is_code_alphabet(code: &str) -> bool {
    !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Validates the format of a caller-supplied short code.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_` (case-sensitive)
/// - Cannot be a reserved route segment
///
/// Availability is checked separately against the link store.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom code must be 1-{MAX_CUSTOM_CODE_LENGTH} characters"),
            json!({ "custom_code": ["length"], "provided_length": code.len() }),
        ));
    }

    if !is_code_alphabet(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "custom_code": ["charset"] }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "custom_code": ["reserved"] }),
        ));
    }

    Ok(())
}
