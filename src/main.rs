//! # Courtside News
//!
//! A basketball news pipeline that gathers items from syndication feeds, a
//! search-results page and a forum listing, keeps a recent and substantive
//! subset, extracts the article text and writes a short original story for
//! each item with YAML front matter and a per-day JSON manifest.
//!
//! ## Usage
//!
//! ```sh
//! courtside_news --site-dir ./site --data-dir ./data
//! ```
//!
//! ## Architecture
//!
//! The run is one sequential pipeline:
//! 1. **Aggregation**: collect candidates from every configured source
//! 2. **Deduplication**: same title on the same domain is one story
//! 3. **Curation**: recency window, link resolution, full-text extraction
//! 4. **Authoring**: heuristic templates, or a chat-completions model when an
//!    API key is present, with the heuristic writer as fallback
//! 5. **Output**: Markdown stories, `index.json` and the raw JSONL log

use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::fs::{self as stdfs, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod author;
mod cli;
mod config;
mod curate;
mod dedup;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod tags;
#[cfg(test)]
mod test_support;
mod utils;

use api::ChatClient;
use author::{Storyteller, Strategy};
use cli::Cli;
use config::PipelineConfig;
use fetch::HttpFetcher;
use outputs::OutputDirs;
use pipeline::Pipeline;

/// Install the stderr subscriber, plus a file layer when `log_dir` is set.
fn init_tracing(log_dir: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_dir {
        Some(dir) => {
            stdfs::create_dir_all(dir)?;
            let path = dir.join(format!("run_{}.log", Utc::now().format("%Y%m%d")));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tfmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing((!args.no_log_file).then_some(args.log_dir.as_path()))?;

    let start_time = std::time::Instant::now();
    info!("courtside_news starting up");
    debug!(?args.site_dir, ?args.data_dir, ?args.config, seed = ?args.seed, "Parsed CLI arguments");

    // ---- Configuration ----
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => {
            let config = PipelineConfig::default();
            config.validate()?;
            config
        }
    };

    // ---- Output directories ----
    let dirs = OutputDirs::prepare(&args.site_dir, &args.data_dir).await?;
    info!(site = %dirs.site().display(), data = %dirs.data().display(), "Output directories ready");

    // ---- Story writer ----
    let strategy = match args.delegated_llm(&config.llm) {
        Some((key, llm)) => {
            let client = ChatClient::new(key, &llm)?;
            info!(model = %client.model(), "Using delegated story writer");
            Strategy::Delegated(client)
        }
        None => {
            info!("No API key; using heuristic story writer");
            Strategy::Heuristic
        }
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let storyteller = Storyteller::new(strategy, rng, config.llm.max_source_chars);

    // ---- Run ----
    let fetcher = HttpFetcher::new(&config)?;
    let mut pipeline = Pipeline::new(config, fetcher, storyteller, dirs);
    let report = pipeline.run(Utc::now()).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    match &report.content_dir {
        Some(dir) => println!("OK: {} stories -> {}", report.curated, dir.display()),
        None => println!("OK: 0 stories"),
    }
    Ok(())
}
