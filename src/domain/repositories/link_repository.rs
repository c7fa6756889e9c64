//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Failure of a click counter update, split by whether it may be retried.
#[derive(Debug, thiserror::Error)]
pub enum ClickWriteError {
    /// The update did not reach the database or was rejected by it.
    #[error("Click update not applied: {0}")]
    NotApplied(String),

    /// The statement was sent but the outcome is unknown; it may have committed.
    #[error("Click update outcome unknown: {0}")]
    Indeterminate(String),
}

impl ClickWriteError {
    /// Only updates known not to have committed are safe to repeat.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotApplied(_))
    }
}

/// Repository interface for the link store.
///
/// Lookups by code ignore the soft-delete flag so that callers can tell
/// "never existed" apart from "deleted" and so that deleted codes stay taken.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `click_count = 0` and an active state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the short code already exists,
    /// whether or not the existing row is active.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, including soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id, including soft-deleted rows.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Atomically adds one click and advances `last_clicked_at`.
    ///
    /// `last_clicked_at` never moves backwards, so out-of-order updates are safe.
    /// Returns `Ok(false)` if no row has that id.
    ///
    /// # Errors
    ///
    /// See [`ClickWriteError`] for which failures may be retried.
    async fn increment_clicks(&self, id: i64, at: DateTime<Utc>)
    -> Result<bool, ClickWriteError>;

    /// Updates the title of an active link.
    ///
    /// When `owner_id` is `None` no owner filter is applied.
    /// Returns `Ok(None)` when nothing matched.
    async fn update_title(
        &self,
        id: i64,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Option<Link>, AppError>;

    /// Marks an active link as deleted.
    ///
    /// Same owner rule as [`LinkRepository::update_title`]. Returns `Ok(false)` if
    /// nothing matched, including links that were already deleted.
    async fn soft_delete(&self, id: i64, owner_id: Option<i64>) -> Result<bool, AppError>;

    /// Lists an owner's active links, newest first.
    async fn list_active_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;
}
