//! Account management: registration, login, profile and password reset.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{Account, DEFAULT_ACCOUNT_NAME, NewAccount};
use crate::domain::identity::{Identity, IdentityProvider};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::utils::password::{
    PasswordError, check_password_policy, hash_password, verify_against_dummy, verify_password,
};

type HmacSha256 = Hmac<Sha256>;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// An account together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

/// Service for account lifecycle and credential checks.
///
/// Password reset tokens embed a fingerprint of the password hash they were
/// issued against: HMAC-SHA256 keyed by `fingerprint_secret`. Changing the
/// password changes the fingerprint, which retires every outstanding token.
pub struct AccountService<A: AccountRepository, I: IdentityProvider> {
    repository: Arc<A>,
    identity: Arc<I>,
    fingerprint_secret: String,
}

impl<A: AccountRepository, I: IdentityProvider> AccountService<A, I> {
    pub fn new(repository: Arc<A>, identity: Arc<I>, fingerprint_secret: String) -> Self {
        Self {
            repository,
            identity,
            fingerprint_secret,
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the password fails the policy
    /// - [`AppError::Conflict`] if the email is already registered
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);
        check_password_policy(password).map_err(password_policy_error)?;

        if self.repository.email_exists(&email).await? {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "field": "email" }),
            ));
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_ACCOUNT_NAME)
            .to_string();

        let password_hash = hash_blocking(password.to_string()).await?;

        let account = self
            .repository
            .create(NewAccount {
                email,
                name,
                password_hash,
            })
            .await?;

        tracing::info!(account_id = account.id, "Account registered");

        let token = self.identity.issue_session(account.id, &account.email)?;
        Ok(AuthSession { account, token })
    }

    /// Verifies credentials and issues a session token.
    ///
    /// Unknown email, deactivated account and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);

        let Some(account) = self.repository.find_active_by_email(&email).await? else {
            // Same Argon2 cost as a wrong password.
            let password = password.to_string();
            let _ = tokio::task::spawn_blocking(move || verify_against_dummy(&password)).await;
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        };

        if !verify_blocking(password.to_string(), account.password_hash.clone()).await? {
            tracing::info!(account_id = account.id, "Login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        }

        let token = self.identity.issue_session(account.id, &account.email)?;
        Ok(AuthSession { account, token })
    }

    /// Resolves a session token to the caller's identity.
    pub fn identify(&self, token: &str) -> Result<Identity, AppError> {
        self.identity.verify_session(token)
    }

    /// Loads the caller's account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account is missing or deactivated.
    pub async fn profile(&self, account_id: i64) -> Result<Account, AppError> {
        self.repository
            .find_by_id(account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or_else(|| AppError::not_found("Account not found", json!({})))
    }

    /// Issues a password reset token for an active account.
    ///
    /// Returns `None` for unknown emails; callers must respond identically in
    /// both cases.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AppError> {
        let email = normalize_email(email);

        let Some(account) = self.repository.find_active_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(None);
        };

        let fingerprint = self.fingerprint(&account);
        let token = self
            .identity
            .issue_reset(account.id, &account.email, &fingerprint)?;

        tracing::info!(account_id = account.id, "Password reset token issued");
        Ok(Some(token))
    }

    /// Sets a new password using a reset token.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] if the token is invalid, expired, or was
    ///   issued before the last password change
    /// - [`AppError::Validation`] if the new password fails the policy
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let claims = self.identity.verify_reset(token)?;
        check_password_policy(new_password).map_err(password_policy_error)?;

        let account = self
            .repository
            .find_by_id(claims.account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or_else(stale_reset_token)?;

        if self.fingerprint(&account) != claims.fingerprint {
            return Err(stale_reset_token());
        }

        let password_hash = hash_blocking(new_password.to_string()).await?;

        if !self
            .repository
            .update_password(account.id, &password_hash)
            .await?
        {
            return Err(stale_reset_token());
        }

        tracing::info!(account_id = account.id, "Password reset completed");
        Ok(())
    }

    fn fingerprint(&self, account: &Account) -> String {
        let mut mac = HmacSha256::new_from_slice(self.fingerprint_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(account.id.to_string().as_bytes());
        mac.update(b":");
        mac.update(account.password_hash.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Trims and lowercases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn stale_reset_token() -> AppError {
    AppError::unauthorized("Invalid or expired token", json!({}))
}

fn password_policy_error(e: PasswordError) -> AppError {
    AppError::bad_request(e.to_string(), json!({ "password": ["policy"] }))
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            AppError::internal(
                "Password hashing task failed",
                json!({ "reason": e.to_string() }),
            )
        })?
        .map_err(|e| {
            AppError::internal("Password hashing failed", json!({ "reason": e.to_string() }))
        })
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            AppError::internal(
                "Password verification task failed",
                json!({ "reason": e.to_string() }),
            )
        })?
        .map_err(|e| {
            AppError::internal(
                "Stored password hash is invalid",
                json!({ "reason": e.to_string() }),
            )
        })
}
