//! # image-scout
//!
//! Batch product-image sourcing. A caller submits product names plus a set
//! of target e-commerce domains; image-scout queries an image-search
//! provider with domain-scoped phrase queries, scores and ranks the raw
//! candidates with a deterministic heuristic, and stores the per-product
//! best matches under an opaque task id with a short retention window.
//! Callers poll the id until it answers `completed` or `not_found`.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │  Provider  │──▶│  Batch pipeline  │──▶│  Task store    │
//! │  SerpAPI   │   │ query→score→rank │   │ memory+SQLite │
//! └────────────┘   └──────────────────┘   └──────┬────────┘
//!                                                │
//!                             ┌──────────────────┤
//!                             ▼                  ▼
//!                        ┌──────────┐      ┌──────────┐
//!                        │   CLI    │      │   HTTP   │
//!                        │ (iscout) │      │  (axum)  │
//!                        └──────────┘      └──────────┘
//! ```
//!
//! Provider failures never fail a batch: affected products degrade to a
//! deterministic fallback candidate set, so the system runs end-to-end
//! without any credential configured.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`provider`] | Search-provider trait, SerpAPI client, disabled mode |
//! | [`pipeline`] | Per-product orchestration and the paced batch loop |
//! | [`db`] | SQLite connection and schema |
//! | [`store_sqlite`] | Durable task store |
//! | [`store`] | Memory-first cached store composition |
//! | [`server`] | HTTP submit/poll boundary |
//! | [`scrape`] | One-shot CLI batch command |
//! | [`get`] | CLI task lookup command |

pub mod config;
pub mod db;
pub mod get;
pub mod pipeline;
pub mod provider;
pub mod scrape;
pub mod server;
pub mod store;
pub mod store_sqlite;
