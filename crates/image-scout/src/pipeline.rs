//! Per-product search orchestration and the batch pipeline.
//!
//! One provider call per product: build the scoped query, map raw candidates
//! through domain filtering and scoring, keep the top N. Provider failures
//! never propagate — the product degrades to deterministic fallback
//! candidates and the batch always completes. Products are processed
//! sequentially in submission order with a pacing delay between live
//! provider calls to respect upstream rate limits.

use std::time::Duration;

use image_scout_core::models::{ProductResults, ScoredImage};
use image_scout_core::query::build_query;
use image_scout_core::rank::{fallback_candidates, select_candidates};

use crate::provider::SearchProvider;

/// Inputs for one batch run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub item_names: Vec<String>,
    pub domains: Vec<String>,
    pub extra_keyword: Option<String>,
    /// Provider-side cap on fetched candidates per product.
    pub max_results_per_item: usize,
    /// Post-filter cap on kept candidates per product.
    pub top_n: usize,
    /// Delay between successive provider calls; applied only when the
    /// provider is live.
    pub pacing_ms: u64,
}

/// Search, filter, score, and rank candidates for a single product.
///
/// A failed provider call — transport, auth, quota, or a malformed or empty
/// payload — yields the fallback set for this product instead of an error:
/// a degraded result is preferred over aborting the whole batch.
pub async fn search_product(
    provider: &dyn SearchProvider,
    product_name: &str,
    domains: &[String],
    extra_keyword: Option<&str>,
    max_results: usize,
    top_n: usize,
) -> Vec<ScoredImage> {
    let query = build_query(product_name, domains, extra_keyword);

    let raw = match provider.search_images(&query, max_results).await {
        Ok(raw) if !raw.is_empty() => raw,
        Ok(_) => {
            tracing::warn!(product = product_name, "provider returned no candidates, using fallback set");
            return degraded(product_name, domains, top_n);
        }
        Err(e) => {
            tracing::warn!(product = product_name, error = %e, "provider search failed, using fallback set");
            return degraded(product_name, domains, top_n);
        }
    };

    select_candidates(product_name, domains, raw, top_n)
}

fn degraded(product_name: &str, domains: &[String], top_n: usize) -> Vec<ScoredImage> {
    let mut fallback = fallback_candidates(product_name, domains);
    fallback.truncate(top_n);
    fallback
}

/// Run the orchestrator over every product in submission order.
///
/// The result map is keyed by the literal product name; a repeated name
/// overwrites the earlier entry. Never fails: every product resolves to
/// real or fallback candidates.
pub async fn run_batch(provider: &dyn SearchProvider, opts: &ScrapeOptions) -> ProductResults {
    let mut results = ProductResults::new();

    for (i, name) in opts.item_names.iter().enumerate() {
        if i > 0 && provider.is_live() && opts.pacing_ms > 0 {
            tokio::time::sleep(Duration::from_millis(opts.pacing_ms)).await;
        }

        let images = search_product(
            provider,
            name,
            &opts.domains,
            opts.extra_keyword.as_deref(),
            opts.max_results_per_item,
            opts.top_n,
        )
        .await;

        tracing::debug!(product = %name, candidates = images.len(), "product resolved");
        results.insert(name.clone(), images);
    }

    results
}
