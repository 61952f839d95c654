//! Core data models for the scoring pipeline and task lifecycle.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One raw image observation returned by the search provider, pre-scoring.
///
/// `position` is the provider-assigned rank hint and is advisory only; the
/// pipeline re-ranks by score. `url` is the full-size image URL and may be
/// empty when the provider only exposes a thumbnail — a candidate with
/// neither is invalid and dropped at the provider boundary.
#[derive(Debug, Clone, Default)]
pub struct RawImage {
    pub position: i64,
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    /// Provider's human-readable source label (site name), used for token
    /// overlap alongside the title.
    pub source: String,
    /// Source page URL; its hostname decides domain membership.
    pub link: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A scored, ranked candidate as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredImage {
    /// Dense 1-based rank after sorting by score descending.
    pub rank: usize,
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    pub source_domain: String,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Deterministic relevance score, clamped at 0 and rounded to 4 decimals.
    pub score: f64,
    /// The allowed domain this candidate satisfied, or empty.
    pub matched_domain: String,
}

/// Mapping from product name to its ranked candidates, truncated to top-N.
pub type ProductResults = HashMap<String, Vec<ScoredImage>>;

/// Terminal state of a batch task.
///
/// There is no `pending`/`processing` variant: the batch pipeline runs to
/// completion before the task is ever stored, so creation and completion are
/// the same store event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

/// One batch submission's resolved outcome, owned by the task store after
/// creation. Serializes to the wire shape callers poll for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    #[serde(default)]
    pub results: ProductResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation instant, ISO 8601.
    pub timestamp: String,
}

impl TaskRecord {
    /// A completed record stamped with the current time.
    pub fn completed(results: ProductResults) -> Self {
        Self {
            status: TaskStatus::Completed,
            results,
            error: None,
            timestamp: now_iso(),
        }
    }

    /// A failed record carrying an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            results: ProductResults::new(),
            error: Some(error.into()),
            timestamp: now_iso(),
        }
    }
}

fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
