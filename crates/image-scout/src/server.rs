//! HTTP boundary for submit and poll.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/scrape` | Submit a batch; returns a task id once processing completes |
//! | `GET`  | `/api/results/{id}` | Poll a task by id |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! The batch pipeline runs to completion inside the submit handler, so the
//! returned task id always polls as `completed` — clients poll defensively
//! to tolerate storage propagation, not in-progress computation, and should
//! stop after a bounded number of attempts.
//!
//! # Error Contract
//!
//! Validation failures return `400` with
//! `{ "error": { "code": "bad_request", "message": "..." } }`. Polling an
//! unknown or expired id returns `404` with
//! `{ "status": "not_found", "error": "..." }` — a normal outcome, distinct
//! from a validation error. Provider hiccups never surface as 5xx; affected
//! products degrade to fallback candidates inside the pipeline.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use image_scout_core::models::{TaskRecord, TaskStatus};
use image_scout_core::store::TaskStore;

use crate::config::Config;
use crate::pipeline::{run_batch, ScrapeOptions};
use crate::provider::{create_provider, SearchProvider};
use crate::store::CachedTaskStore;

/// Shared application state passed to route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<CachedTaskStore>,
    provider: Arc<dyn SearchProvider>,
}

/// Batch submission payload.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub item_names: Vec<String>,
    pub domains: Vec<String>,
    #[serde(default)]
    pub extra_keyword: Option<String>,
    #[serde(default)]
    pub max_results_per_item: Option<usize>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Serialize)]
struct ScrapeResponse {
    task_id: String,
    status: TaskStatus,
    message: String,
}

#[derive(Serialize)]
struct NotFoundBody {
    status: &'static str,
    error: &'static str,
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Reject structurally invalid submissions before any provider call.
fn validate_request(req: &ScrapeRequest) -> Result<(), String> {
    if req.item_names.is_empty() {
        return Err("item_names is required and must be a non-empty array".to_string());
    }
    if req.domains.is_empty() {
        return Err("domains is required and must be a non-empty array".to_string());
    }
    Ok(())
}

// ============ Handlers ============

async fn handle_scrape(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, AppError> {
    validate_request(&req).map_err(AppError::bad_request)?;

    let opts = ScrapeOptions {
        item_names: req.item_names,
        domains: req.domains,
        extra_keyword: req.extra_keyword,
        max_results_per_item: req
            .max_results_per_item
            .unwrap_or(state.config.scrape.max_results_per_item),
        top_n: req.top_n.unwrap_or(state.config.scrape.top_n),
        pacing_ms: state.config.provider.pacing_ms,
    };

    // Synchronous by design: the batch resolves before the id exists, so a
    // pending state is never observable.
    let results = run_batch(state.provider.as_ref(), &opts).await;

    let task_id = Uuid::new_v4().to_string();
    state
        .store
        .set(&task_id, TaskRecord::completed(results))
        .await
        .map_err(|e| AppError::internal(format!("failed to store task: {}", e)))?;

    tracing::info!(task = %task_id, "batch completed and stored");

    Ok(Json(ScrapeResponse {
        task_id,
        status: TaskStatus::Completed,
        message: "Scraping completed successfully".to_string(),
    }))
}

async fn handle_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match state.store.get(&id).await {
        Ok(Some(record)) => Ok(Json(record).into_response()),
        Ok(None) => Ok((
            StatusCode::NOT_FOUND,
            Json(NotFoundBody {
                status: "not_found",
                error: "Task not found or results expired",
            }),
        )
            .into_response()),
        Err(e) => Err(AppError::internal(format!("task lookup failed: {}", e))),
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============ Bootstrap ============

/// Interval between expired-task sweeps. Lazy eviction on `get` is the
/// correctness mechanism; the sweep only bounds memory.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the HTTP server on the configured bind address.
///
/// Runs until the process is terminated. The store and provider are
/// constructed here and owned by the router state.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let provider: Arc<dyn SearchProvider> = Arc::from(create_provider(config)?);
    let store = Arc::new(CachedTaskStore::open(config).await);

    let sweeper_store = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sweeper_store.purge_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(purged = n, "evicted expired tasks"),
                Err(e) => tracing::warn!(error = %e, "expired-task sweep failed"),
            }
        }
    });

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        provider,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/scrape", post(handle_scrape))
        .route("/api/results/{id}", get(handle_results))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %bind_addr, "image-scout server listening");
    println!("image-scout server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
