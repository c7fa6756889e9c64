//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkState, NewLink};
use crate::domain::repositories::{ClickWriteError, LinkRepository};
use crate::error::AppError;
use crate::utils::db_error::{classify_click_write, is_unique_violation_on_code};

const LINK_COLUMNS: &str = "id, short_code, original_url, title, owner_id, created_at, \
                            expires_at, click_count, last_clicked_at, is_active";

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    title: String,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    last_clicked_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            short_code: r.short_code,
            original_url: r.original_url,
            title: r.title,
            owner_id: r.owner_id,
            created_at: r.created_at,
            expires_at: r.expires_at,
            click_count: r.click_count,
            last_clicked_at: r.last_clicked_at,
            state: LinkState::from_active_flag(r.is_active),
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized. Counter updates are single atomic
/// `UPDATE` statements, never read-modify-write.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (short_code, original_url, title, owner_id, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.short_code)
            .bind(&new_link.original_url)
            .bind(&new_link.title)
            .bind(new_link.owner_id)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_code(&e) => Err(AppError::CodeTaken {
                code: new_link.short_code,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool, ClickWriteError> {
        // Acquire separately: a failure here means the update was never sent.
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ClickWriteError::NotApplied(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE links
            SET click_count = click_count + 1,
                last_clicked_at = GREATEST(COALESCE(last_clicked_at, $2), $2)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&mut *conn)
        .await
        .map_err(classify_click_write)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_title(
        &self,
        id: i64,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Option<Link>, AppError> {
        // A NULL owner disables the owner filter: anonymous callers can retitle
        // any active link, including ownerless ones created before accounts existed.
        let sql = format!(
            r#"
            UPDATE links
            SET title = $2
            WHERE id = $1
              AND is_active
              AND ($3::bigint IS NULL OR owner_id = $3)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(title)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn soft_delete(&self, id: i64, owner_id: Option<i64>) -> Result<bool, AppError> {
        // Same owner rule as `update_title`.
        let result = sqlx::query(
            r#"
            UPDATE links
            SET is_active = FALSE
            WHERE id = $1
              AND is_active
              AND ($2::bigint IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1 AND is_active
            ORDER BY created_at DESC, id DESC
            "#
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }
}
