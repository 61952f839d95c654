//! One-shot `iscout scrape` command: run a batch, store it, print the result.

use anyhow::{bail, Result};
use serde::Serialize;
use uuid::Uuid;

use image_scout_core::models::{ProductResults, TaskRecord, TaskStatus};
use image_scout_core::store::TaskStore;

use crate::config::Config;
use crate::pipeline::{run_batch, ScrapeOptions};
use crate::provider::create_provider;
use crate::store::CachedTaskStore;

/// What the command prints: the stored record plus its task id, so the
/// result can be fetched again later with `iscout get <task-id>`.
#[derive(Serialize)]
struct ScrapeOutput {
    task_id: String,
    status: TaskStatus,
    timestamp: String,
    results: ProductResults,
}

pub async fn run_scrape(
    config: &Config,
    items: Vec<String>,
    domains: Vec<String>,
    extra_keyword: Option<String>,
    max_results: Option<usize>,
    top_n: Option<usize>,
) -> Result<()> {
    if items.is_empty() {
        bail!("at least one --item is required");
    }
    if domains.is_empty() {
        bail!("at least one --domain is required");
    }

    let provider = create_provider(config)?;
    let store = CachedTaskStore::open(config).await;

    let opts = ScrapeOptions {
        item_names: items,
        domains,
        extra_keyword,
        max_results_per_item: max_results.unwrap_or(config.scrape.max_results_per_item),
        top_n: top_n.unwrap_or(config.scrape.top_n),
        pacing_ms: config.provider.pacing_ms,
    };

    let results = run_batch(provider.as_ref(), &opts).await;

    let task_id = Uuid::new_v4().to_string();
    let record = TaskRecord::completed(results);
    store.set(&task_id, record.clone()).await?;

    let output = ScrapeOutput {
        task_id,
        status: record.status,
        timestamp: record.timestamp,
        results: record.results,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
