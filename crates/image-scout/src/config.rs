//! TOML configuration parsing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/image-scout.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7431".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// `"serpapi"` or `"disabled"`. A serpapi provider whose key variable is
    /// unset degrades to disabled at startup rather than failing.
    #[serde(default = "default_provider")]
    pub name: String,
    /// Environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay between successive provider calls within one batch. Only
    /// applied when a real credential is configured.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

fn default_provider() -> String {
    "serpapi".to_string()
}
fn default_api_key_env() -> String {
    "SERPAPI_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_pacing_ms() -> u64 {
    800
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    /// Provider-side cap on candidates fetched per product.
    #[serde(default = "default_max_results_per_item")]
    pub max_results_per_item: usize,
    /// Post-filter cap on candidates kept per product.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Retention window for stored task results.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_results_per_item: default_max_results_per_item(),
            top_n: default_top_n(),
            retention_secs: default_retention_secs(),
        }
    }
}

fn default_max_results_per_item() -> usize {
    5
}
fn default_top_n() -> usize {
    3
}
fn default_retention_secs() -> u64 {
    600
}

/// Load configuration from `path`, or fall back to full defaults when the
/// file does not exist — disabled-provider mode must run with zero setup.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.provider.name.as_str() {
        "serpapi" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown search provider: '{}'. Must be serpapi or disabled.",
            other
        ),
    }

    if config.scrape.top_n == 0 {
        anyhow::bail!("scrape.top_n must be >= 1");
    }
    if config.scrape.max_results_per_item == 0 {
        anyhow::bail!("scrape.max_results_per_item must be >= 1");
    }
    if config.scrape.retention_secs == 0 {
        anyhow::bail!("scrape.retention_secs must be >= 1");
    }

    Ok(config)
}
