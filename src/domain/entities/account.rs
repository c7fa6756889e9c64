//! Account entity: the identity that can own links.

use chrono::{DateTime, Utc};

/// Display name given to accounts registered without one.
pub const DEFAULT_ACCOUNT_NAME: &str = "User";

/// A registered user account.
///
/// `password_hash` is an Argon2id PHC string and must never leave the service
/// layer; API DTOs copy every field except it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Input data for registering a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}
