//! # image-scout CLI (`iscout`)
//!
//! Commands for initializing the task database, running one-shot scrape
//! batches, fetching stored task results, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! iscout --config ./config/iscout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `iscout init` | Create the SQLite task database (idempotent) |
//! | `iscout scrape --item … --domain …` | Run a batch now and print the stored result |
//! | `iscout get <task-id>` | Fetch a stored task by id |
//! | `iscout serve` | Start the HTTP submit/poll server |
//!
//! Without a `SERPAPI_KEY` (or the configured key variable) the provider is
//! disabled and every product resolves to deterministic demo candidates, so
//! all commands work with zero setup.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use image_scout::{config, db, get, scrape, server};

/// image-scout CLI — batch product-image sourcing from target domains.
#[derive(Parser)]
#[command(
    name = "iscout",
    about = "image-scout — batch product-image sourcing scoped to target domains",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "./config/iscout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the task database schema. Idempotent.
    Init,

    /// Run a scrape batch now and print the stored result as JSON.
    ///
    /// The result is also stored under a task id with the configured
    /// retention window, so it can be fetched again with `iscout get`.
    Scrape {
        /// Product name to search for. Repeatable.
        #[arg(long = "item", required = true)]
        items: Vec<String>,

        /// Allowed source domain. Repeatable; order decides which domain an
        /// overlapping host is attributed to.
        #[arg(long = "domain", required = true)]
        domains: Vec<String>,

        /// Free-text keyword injected ahead of the quoted product name.
        #[arg(long)]
        extra_keyword: Option<String>,

        /// Provider-side cap on candidates fetched per product.
        #[arg(long)]
        max_results: Option<usize>,

        /// Post-filter cap on candidates kept per product.
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Fetch a stored task by id.
    Get {
        /// Task id returned by a previous scrape.
        id: String,
    },

    /// Start the HTTP submit/poll server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            db::run_migrations(&pool).await?;
            pool.close().await;
            println!("Task database initialized successfully.");
        }
        Commands::Scrape {
            items,
            domains,
            extra_keyword,
            max_results,
            top_n,
        } => {
            scrape::run_scrape(&cfg, items, domains, extra_keyword, max_results, top_n).await?;
        }
        Commands::Get { id } => {
            get::run_get(&cfg, &id).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
