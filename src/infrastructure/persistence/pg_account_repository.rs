//! PostgreSQL implementation of account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Account, NewAccount};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::utils::db_error::{ACCOUNT_EMAIL_CONSTRAINT, is_unique_violation_on};

const ACCOUNT_COLUMNS: &str = "id, email, name, password_hash, created_at, is_active";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    is_active: bool,
}

impl From<AccountRow> for Account {
    fn from(r: AccountRow) -> Self {
        Account {
            id: r.id,
            email: r.email,
            name: r.name,
            password_hash: r.password_hash,
            created_at: r.created_at,
            is_active: r.is_active,
        }
    }
}

/// PostgreSQL repository for user accounts.
///
/// Only Argon2 password hashes are stored; plaintext never reaches this layer.
pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let sql = format!(
            r#"
            INSERT INTO accounts (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(&new_account.email)
            .bind(&new_account.name)
            .bind(&new_account.password_hash)
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on(&e, ACCOUNT_EMAIL_CONSTRAINT) => Err(
                AppError::conflict("Email is already registered", json!({ "field": "email" })),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Account::from))
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 AND is_active");

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Account::from))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
