//! Search provider abstraction and implementations.
//!
//! Defines the [`SearchProvider`] trait and concrete implementations:
//! - **[`SerpApiProvider`]** — Google Images via the SerpAPI HTTP API, with
//!   retry and exponential backoff.
//! - **[`DisabledProvider`]** — always errors; used when no credential is
//!   configured. The pipeline absorbs the error into deterministic fallback
//!   candidates, so a disabled provider still yields a completed batch.
//!
//! # Retry Strategy
//!
//! Transient failures are retried with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use image_scout_core::models::RawImage;

use crate::config::Config;

/// An external image-search capability: given a query string, return raw
/// candidates with metadata. May fail; callers must treat failure as
/// degraded data, never as a batch-fatal error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier (e.g. `"serpapi"`).
    fn name(&self) -> &str;

    /// True when backed by a real upstream credential. Drives inter-call
    /// pacing in the batch pipeline — fallback mode needs no rate limiting.
    fn is_live(&self) -> bool;

    /// Run one image search, returning up to `max_results` raw candidates.
    async fn search_images(&self, query: &str, max_results: usize) -> Result<Vec<RawImage>>;
}

/// Instantiate the provider selected by the configuration.
///
/// A `serpapi` provider whose key variable is unset degrades to
/// [`DisabledProvider`] with a warning rather than failing: the system is
/// expected to run end-to-end in fallback mode with zero setup.
pub fn create_provider(config: &Config) -> Result<Box<dyn SearchProvider>> {
    match config.provider.name.as_str() {
        "serpapi" => match std::env::var(&config.provider.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                Ok(Box::new(SerpApiProvider::new(key.trim().to_string(), config)?))
            }
            _ => {
                tracing::warn!(
                    env = %config.provider.api_key_env,
                    "no provider API key set, falling back to demo candidates"
                );
                Ok(Box::new(DisabledProvider))
            }
        },
        "disabled" => Ok(Box::new(DisabledProvider)),
        other => bail!("Unknown search provider: {}", other),
    }
}

// ============ Disabled Provider ============

/// A no-op provider that always returns an error.
///
/// The per-product orchestrator turns the error into fallback candidates,
/// so this is the zero-configuration demo mode, not a dead end.
pub struct DisabledProvider;

#[async_trait]
impl SearchProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn search_images(&self, _query: &str, _max_results: usize) -> Result<Vec<RawImage>> {
        bail!("search provider is disabled (no API key configured)")
    }
}

// ============ SerpAPI Provider ============

const SERPAPI_URL: &str = "https://serpapi.com/search";

/// Google Images search via SerpAPI.
pub struct SerpApiProvider {
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl SerpApiProvider {
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()?;
        Ok(Self {
            api_key,
            max_retries: config.provider.max_retries,
            client,
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn is_live(&self) -> bool {
        true
    }

    async fn search_images(&self, query: &str, max_results: usize) -> Result<Vec<RawImage>> {
        let num = max_results.to_string();
        let params = [
            ("engine", "google"),
            ("q", query),
            ("tbm", "isch"),
            ("num", num.as_str()),
            ("api_key", self.api_key.as_str()),
        ];

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.get(SERPAPI_URL).query(&params).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_images_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("SerpAPI error {}: {}", status, body_text));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("SerpAPI error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(anyhow::anyhow!("SerpAPI request failed: {}", e));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("SerpAPI request failed")))
    }
}

/// Parse a SerpAPI image-search payload into raw candidates.
///
/// A payload without an `images_results` array is malformed and rejected —
/// the orchestrator treats that the same as a transport failure. Entries
/// with neither a full-size nor a thumbnail URL are invalid and skipped.
pub fn parse_images_response(json: &serde_json::Value) -> Result<Vec<RawImage>> {
    let images = match json.get("images_results").and_then(|v| v.as_array()) {
        Some(arr) => arr,
        None => bail!("malformed SerpAPI payload: missing images_results"),
    };

    let str_of = |v: &serde_json::Value, key: &str| -> String {
        v.get(key).and_then(|s| s.as_str()).unwrap_or_default().to_string()
    };
    let dim_of = |v: &serde_json::Value, key: &str| -> Option<u32> {
        v.get(key).and_then(|n| n.as_u64()).and_then(|n| u32::try_from(n).ok())
    };

    let mut out = Vec::with_capacity(images.len());
    for (i, img) in images.iter().enumerate() {
        let url = str_of(img, "original");
        let thumbnail = str_of(img, "thumbnail");
        if url.is_empty() && thumbnail.is_empty() {
            continue;
        }
        out.push(RawImage {
            position: img
                .get("position")
                .and_then(|p| p.as_i64())
                .unwrap_or(i as i64 + 1),
            url,
            thumbnail,
            title: str_of(img, "title"),
            source: str_of(img, "source"),
            link: str_of(img, "link"),
            width: dim_of(img, "original_width"),
            height: dim_of(img, "original_height"),
        });
    }

    Ok(out)
}
