//! SQLite-backed [`TaskStore`] implementation.
//!
//! Each task is one row in the `tasks` table with its record serialized as
//! JSON and an absolute expiry instant. `get` deletes a row it finds
//! expired before answering absent, mirroring the in-memory store's lazy
//! eviction.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::time::Duration;

use image_scout_core::models::TaskRecord;
use image_scout_core::store::TaskStore;

/// SQLite implementation of the [`TaskStore`] trait.
pub struct SqliteTaskStore {
    pool: SqlitePool,
    retention_ms: i64,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool, retention: Duration) -> Self {
        Self {
            pool,
            retention_ms: retention.as_millis() as i64,
        }
    }

    /// Like [`TaskStore::get`], but also expose the stored expiry so a
    /// cache layer can re-prime itself without extending the record's
    /// lifetime.
    pub async fn get_with_expiry(&self, id: &str) -> Result<Option<(TaskRecord, i64)>> {
        let row = sqlx::query("SELECT payload_json, expires_at FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let expires_at: i64 = row.get("expires_at");
        if expires_at <= now_ms() {
            sqlx::query("DELETE FROM tasks WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            return Ok(None);
        }

        let payload: String = row.get("payload_json");
        let record: TaskRecord = serde_json::from_str(&payload)?;
        Ok(Some((record, expires_at)))
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn set(&self, id: &str, record: TaskRecord) -> Result<()> {
        let payload = serde_json::to_string(&record)?;
        let now = now_ms();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, status, payload_json, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                payload_json = excluded.payload_json,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(id)
        .bind(record.status.as_str())
        .bind(&payload)
        .bind(now)
        .bind(now + self.retention_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>> {
        Ok(self.get_with_expiry(id).await?.map(|(record, _)| record))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let result = sqlx::query("DELETE FROM tasks WHERE expires_at <= ?")
            .bind(now_ms())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() as usize)
    }
}
