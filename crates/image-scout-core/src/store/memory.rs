//! In-memory [`TaskStore`] implementation.
//!
//! A `HashMap` behind `std::sync::RwLock`. The write lock is taken for every
//! operation (including `get`, which may evict), so all operations on the
//! store are serialized — strictly stronger than the per-id requirement.
//! Retention is fixed at construction; `set` stamps each record's absolute
//! expiry and `get` lazily evicts anything past it.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::TaskStore;
use crate::models::TaskRecord;

struct StoredTask {
    record: TaskRecord,
    expires_at_ms: i64,
}

/// In-memory task store with expiry-based eviction.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, StoredTask>>,
    retention_ms: i64,
}

impl InMemoryTaskStore {
    /// Create an empty store whose records live for `retention` after `set`.
    pub fn new(retention: Duration) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            retention_ms: retention.as_millis() as i64,
        }
    }

    /// Re-insert a record with an already-stamped expiry.
    ///
    /// Used by layered stores to prime this cache from a durable copy
    /// without extending the record's original lifetime. An expiry in the
    /// past is stored as-is and evicted on the next `get`.
    pub fn restore(&self, id: &str, record: TaskRecord, expires_at_ms: i64) {
        let mut tasks = self.tasks.write().unwrap();
        tasks.insert(id.to_string(), StoredTask { record, expires_at_ms });
    }

    /// Number of live (possibly expired, not yet evicted) records.
    pub fn len(&self) -> usize {
        self.tasks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn set(&self, id: &str, record: TaskRecord) -> Result<()> {
        let mut tasks = self.tasks.write().unwrap();
        tasks.insert(
            id.to_string(),
            StoredTask {
                record,
                expires_at_ms: now_ms() + self.retention_ms,
            },
        );
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TaskRecord>> {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get(id) {
            Some(t) if t.expires_at_ms > now_ms() => Ok(Some(t.record.clone())),
            Some(_) => {
                tasks.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.tasks.write().unwrap().remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut tasks = self.tasks.write().unwrap();
        let before = tasks.len();
        let now = now_ms();
        tasks.retain(|_, t| t.expires_at_ms > now);
        Ok(before - tasks.len())
    }
}
