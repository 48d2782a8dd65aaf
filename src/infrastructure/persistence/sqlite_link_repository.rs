//! SQLite implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_key: String,
    target_url: String,
    user_id: i64,
    password_hash: Option<String>,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.short_key,
            r.target_url,
            r.user_id,
            r.password_hash,
            r.clicks,
            r.created_at,
        )
    }
}

const LINK_COLUMNS: &str = "id, short_key, target_url, user_id, password_hash, clicks, created_at";

/// SQLite repository for link storage, ownership queries, and click accounting.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (short_key, target_url, user_id, password_hash, clicks, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.key)
            .bind(&new_link.target_url)
            .bind(new_link.user_id)
            .bind(&new_link.password_hash)
            .bind(Utc::now())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_key = ?");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = ?");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let clear_password = matches!(patch.password_hash, Some(None));
        let new_password = patch.password_hash.flatten();

        let sql = format!(
            r#"
            UPDATE links
            SET target_url    = COALESCE(?, target_url),
                password_hash = CASE
                                    WHEN ? THEN NULL
                                    ELSE COALESCE(?, password_hash)
                                END
            WHERE id = ?
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&patch.target_url)
            .bind(clear_password)
            .bind(&new_password)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }
}
