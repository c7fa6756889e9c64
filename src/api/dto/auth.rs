//! DTOs for account endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Account;
use crate::domain::identity::Identity;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"), length(max = 320))]
    pub email: String,

    /// Checked against the password policy by the account service.
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(length(max = 255))]
    pub name: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 320))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Request body for `POST /api/auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"), length(max = 320))]
    pub email: String,
}

/// Request body for `POST /api/auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub token: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// Public view of an account. The password hash is never serialized.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            created_at: account.created_at,
        }
    }
}

/// Response for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub token: String,
}

/// Response for `POST /api/auth/forgot-password`.
///
/// Identical whether or not the email is registered, except that
/// `reset_token` is filled when token exposure is enabled and an account matched.
#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for `GET /api/auth/verify-token`.
#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub account_id: i64,
    pub email: String,
}

impl From<Identity> for VerifyTokenResponse {
    fn from(identity: Identity) -> Self {
        Self {
            valid: true,
            account_id: identity.account_id,
            email: identity.email,
        }
    }
}
