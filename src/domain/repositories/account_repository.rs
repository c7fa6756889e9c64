//! Repository trait for account data access.

use crate::domain::entities::{Account, NewAccount};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// Emails are expected to be normalized (trimmed, lowercase) by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;

    /// Finds an active account by email. Deactivated accounts are not returned.
    async fn find_active_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Returns true if any account, active or not, uses this email.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Replaces the stored password hash. Returns `Ok(false)` if no row matched.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError>;
}
