//! Layered task store: in-memory cache in front of best-effort SQLite.
//!
//! The cache is the source of truth within the retention window; the
//! durable layer only widens the window across process restarts and is
//! never allowed to fail a request. A persistence error is logged and the
//! caller proceeds on the in-memory path — poll must still succeed even
//! when the durable write was lost.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use image_scout_core::models::TaskRecord;
use image_scout_core::store::memory::InMemoryTaskStore;
use image_scout_core::store::TaskStore;

use crate::config::Config;
use crate::db;
use crate::store_sqlite::SqliteTaskStore;

/// Memory-first task store with optional SQLite behind it.
pub struct CachedTaskStore {
    cache: InMemoryTaskStore,
    durable: Option<SqliteTaskStore>,
}

impl CachedTaskStore {
    /// Purely in-memory store (no durable layer).
    pub fn in_memory(retention: Duration) -> Self {
        Self {
            cache: InMemoryTaskStore::new(retention),
            durable: None,
        }
    }

    /// Open the store for `config`: memory cache plus the configured SQLite
    /// database. A database that cannot be opened or migrated downgrades to
    /// memory-only with a warning — never a startup failure.
    pub async fn open(config: &Config) -> Self {
        let retention = Duration::from_secs(config.scrape.retention_secs);

        let durable = match db::connect(config).await {
            Ok(pool) => match db::run_migrations(&pool).await {
                Ok(()) => Some(SqliteTaskStore::new(pool, retention)),
                Err(e) => {
                    tracing::warn!(error = %e, "task database migration failed, running memory-only");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "task database unavailable, running memory-only");
                None
            }
        };

        Self {
            cache: InMemoryTaskStore::new(retention),
            durable,
        }
    }
}

#[async_trait]
impl TaskStore for CachedTaskStore {
    async fn set(&self, id: &str, record: TaskRecord) -> Result<()> {
        self.cache.set(id, record.clone()).await?;

        if let Some(durable) = &self.durable {
            if let Err(e) = durable.set(id, record).await {
                tracing::warn!(task = id, error = %e, "failed to persist task, serving from memory only");
            }
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>> {
        if let Some(record) = self.cache.get(id).await? {
            return Ok(Some(record));
        }

        // Cache miss (e.g. another process wrote it, or we restarted):
        // fall back to the durable copy and re-prime the cache without
        // extending the record's original expiry.
        if let Some(durable) = &self.durable {
            match durable.get_with_expiry(id).await {
                Ok(Some((record, expires_at))) => {
                    self.cache.restore(id, record.clone(), expires_at);
                    return Ok(Some(record));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(task = id, error = %e, "durable task read failed");
                }
            }
        }

        Ok(None)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.cache.delete(id).await?;
        if let Some(durable) = &self.durable {
            if let Err(e) = durable.delete(id).await {
                tracing::warn!(task = id, error = %e, "durable task delete failed");
            }
        }
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut purged = self.cache.purge_expired().await?;
        if let Some(durable) = &self.durable {
            match durable.purge_expired().await {
                Ok(n) => purged += n,
                Err(e) => {
                    tracing::warn!(error = %e, "durable task purge failed");
                }
            }
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_scout_core::models::ProductResults;

    #[tokio::test]
    async fn memory_only_round_trip() {
        let store = CachedTaskStore::in_memory(Duration::from_secs(600));
        store.set("t1", TaskRecord::completed(ProductResults::new())).await.unwrap();
        assert!(store.get("t1").await.unwrap().is_some());
        store.delete("t1").await.unwrap();
        assert!(store.get("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn durable_layer_survives_a_cold_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.db.path = dir.path().join("tasks.sqlite");

        let store = CachedTaskStore::open(&config).await;
        store.set("t1", TaskRecord::completed(ProductResults::new())).await.unwrap();

        // A second store over the same database simulates a restart with an
        // empty cache; the durable copy answers the poll.
        let cold = CachedTaskStore::open(&config).await;
        assert!(cold.get("t1").await.unwrap().is_some());
        // The record was re-primed into the cold cache.
        assert!(cold.cache.get("t1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_absent_in_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.db.path = dir.path().join("tasks.sqlite");

        let store = CachedTaskStore::open(&config).await;
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
