//! Identity provider contract.
//!
//! Bearer tokens are opaque to the rest of the crate: they are issued and
//! verified only through [`IdentityProvider`]. The JWT-backed implementation
//! lives in [`crate::infrastructure::identity`].

use crate::error::AppError;

/// Authenticated caller resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: i64,
    pub email: String,
}

/// Claims recovered from a valid password reset token.
///
/// `fingerprint` binds the token to the password hash current at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetClaims {
    pub account_id: i64,
    pub email: String,
    pub fingerprint: String,
}

/// Issues and verifies bearer tokens.
///
/// Verification failures of any kind (bad signature, expired, wrong purpose)
/// are reported as [`AppError::Unauthorized`].
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    fn issue_session(&self, account_id: i64, email: &str) -> Result<String, AppError>;

    fn verify_session(&self, token: &str) -> Result<Identity, AppError>;

    fn issue_reset(
        &self,
        account_id: i64,
        email: &str,
        fingerprint: &str,
    ) -> Result<String, AppError>;

    fn verify_reset(&self, token: &str) -> Result<ResetClaims, AppError>;
}
