//! `iscout get` command: poll the task store for a stored batch result.

use anyhow::Result;

use image_scout_core::store::TaskStore;

use crate::config::Config;
use crate::store::CachedTaskStore;

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let store = CachedTaskStore::open(config).await;

    match store.get(id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            // Not-found is a normal outcome (unknown or expired id), printed
            // in the same shape the HTTP boundary returns.
            println!(
                "{}",
                serde_json::json!({
                    "status": "not_found",
                    "error": "Task not found or results expired",
                })
            );
        }
    }

    Ok(())
}
