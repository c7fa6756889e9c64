//! Helpers for classifying PostgreSQL errors.

use crate::domain::repositories::ClickWriteError;

/// Unique constraint guarding short code uniqueness across all links.
pub const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

/// Unique constraint on account emails.
pub const ACCOUNT_EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Returns true if `e` is a unique violation on the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    is_unique_violation_on(e, SHORT_CODE_CONSTRAINT)
}

/// Classifies a failed click update statement.
///
/// An error reported by the server means the single-statement transaction was
/// rolled back. Transport errors after the statement was sent leave the
/// outcome unknown.
pub fn classify_click_write(e: sqlx::Error) -> ClickWriteError {
    match e {
        sqlx::Error::Database(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ClickWriteError::NotApplied(e.to_string())
        }
        other => ClickWriteError::Indeterminate(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_violation() {
        assert!(!is_unique_violation_on_code(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on(
            &sqlx::Error::PoolTimedOut,
            ACCOUNT_EMAIL_CONSTRAINT
        ));
    }

    #[test]
    fn test_click_write_classification() {
        assert!(classify_click_write(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(classify_click_write(sqlx::Error::PoolClosed).is_retryable());
        assert!(
            !classify_click_write(sqlx::Error::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionReset
            )))
            .is_retryable()
        );
    }
}
