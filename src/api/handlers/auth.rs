//! Handlers for account endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    AccountResponse, AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest, VerifyTokenResponse,
};
use crate::api::dto::envelope::ApiResponse;
use crate::api::middleware::Authenticated;
use crate::application::services::AuthSession;
use crate::error::AppError;
use crate::state::AppState;

const RESET_REQUESTED: &str =
    "If the email is registered, password reset instructions have been issued";

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            account: session.account.into(),
            token: session.token,
        }
    }
}

/// Creates an account and signs it in.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Request Body
///
/// ```json
/// { "email": "ann@example.com", "password": "Secret123", "name": "Ann" }
/// ```
///
/// # Errors
///
/// - `400` for an invalid email or a password failing the policy
/// - `409` if the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<AuthResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let session = state
        .account_service
        .register(&payload.email, &payload.password, payload.name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok(session.into())))
}

/// Exchanges credentials for a session token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let session = state
        .account_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::ok(session.into()))
}

/// Starts a password reset.
///
/// # Endpoint
///
/// `POST /api/auth/forgot-password`
///
/// The response does not reveal whether the email is registered. There is no
/// mail delivery; the token is returned in `reset_token` only when
/// `EXPOSE_RESET_TOKENS` is enabled.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<ApiResponse<ForgotPasswordResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .account_service
        .request_password_reset(&payload.email)
        .await?;

    let reset_token = token.filter(|_| state.settings.expose_reset_tokens);

    Ok(ApiResponse::ok(ForgotPasswordResponse {
        message: RESET_REQUESTED,
        reset_token,
    }))
}

/// Sets a new password using a reset token.
///
/// # Endpoint
///
/// `POST /api/auth/reset-password`
///
/// A token stops working once the password it was issued for has changed.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    state
        .account_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(ApiResponse::ok(MessageResponse {
        message: "Password has been reset",
    }))
}

/// Reports the identity behind the bearer token.
///
/// # Endpoint
///
/// `GET /api/auth/verify-token`
pub async fn verify_token_handler(
    Authenticated(identity): Authenticated,
) -> ApiResponse<VerifyTokenResponse> {
    ApiResponse::ok(identity.into())
}

/// Returns the caller's account.
///
/// # Endpoint
///
/// `GET /api/auth/profile`
pub async fn profile_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<ApiResponse<AccountResponse>, AppError> {
    let account = state.account_service.profile(identity.account_id).await?;

    Ok(ApiResponse::ok(account.into()))
}
