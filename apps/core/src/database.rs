//! Append-only feedback persistence on SQLite.

use crate::error::AppError;
use crate::models::FeedbackRecord;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Append-only persistence for feedback submissions. Must tolerate
/// concurrent writers; no update-in-place is required at this layer.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn append(&self, body: &str, email: &str) -> Result<(), AppError>;
}

pub struct SqliteFeedbackStore {
    pool: SqlitePool,
}

impl SqliteFeedbackStore {
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let db_url = format!("sqlite://{}", path.to_string_lossy());
        info!(url = %db_url, "Opening feedback database");
        let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A throwaway store backed by a single in-memory connection.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // One connection only: each pooled :memory: connection would get its
        // own private database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                email TEXT NOT NULL,
                handled INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// All submissions in insertion order, for the administrative surface.
    pub async fn list(&self) -> Result<Vec<FeedbackRecord>, AppError> {
        let records = sqlx::query_as::<_, FeedbackRecord>(
            "SELECT id, body, email, handled, created_at FROM feedback ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn append(&self, body: &str, email: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO feedback (body, email, handled, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(body)
        .bind(email)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        info!("Feedback recorded");
        Ok(())
    }
}
