//! Task lifecycle storage.
//!
//! The [`TaskStore`] trait defines the keyed task-record storage used by the
//! submit/poll boundary, enabling pluggable backends (in-memory, SQLite, a
//! layered cache of both). Stores are constructed explicitly and passed to
//! their owners — there is no process-wide singleton.
//!
//! # Lifecycle
//!
//! A record goes *absent* → *present* (one `set`, stamped with
//! `expiry = now + retention`) → *absent* again, either lazily when a `get`
//! finds the expiry has passed, or through a periodic [`purge_expired`]
//! sweep. Lazy expiry on `get` is the correctness mechanism; the sweep is a
//! memory-bound backstop. There is no in-progress state: the batch pipeline
//! completes before the record is written.
//!
//! Implementations must be `Send + Sync` and serialize concurrent
//! `set`/`get`/`delete` on the same id — at most one logical record per id
//! at any instant, and evicting or deleting an already-absent id is a no-op.
//!
//! [`purge_expired`]: TaskStore::purge_expired

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::TaskRecord;

/// Abstract task-record store with expiry-based eviction.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Store `record` under `id`, stamping `expiry = now + retention`.
    /// Overwrites any prior value for that id.
    async fn set(&self, id: &str, record: TaskRecord) -> Result<()>;

    /// Return the record if present and unexpired. A record found expired is
    /// evicted before answering `None`.
    async fn get(&self, id: &str) -> Result<Option<TaskRecord>>;

    /// Remove the record unconditionally. Idempotent — deleting an absent id
    /// is a no-op, never an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Drop every expired record, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}
