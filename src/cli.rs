//! Command-line interface definitions for Courtside News.
//!
//! Every option can also come from the environment where noted. The presence
//! of an API key selects the delegated story writer for the whole run.

use clap::Parser;
use std::path::PathBuf;

use crate::config::LlmConfig;

/// Command-line arguments for the Courtside News pipeline.
///
/// # Examples
///
/// ```sh
/// # Heuristic writer, default directories
/// courtside_news
///
/// # Pinned randomness and a custom site directory
/// courtside_news --site-dir /srv/site --seed 42
///
/// # Delegated writer
/// OPENAI_API_KEY=sk-... courtside_news --openai-model gpt-4o-mini
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML pipeline config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Site directory; stories go under `<site>/content/<date>/`
    #[arg(short, long, default_value = "./site")]
    pub site_dir: PathBuf,

    /// Data directory for the raw JSONL log
    #[arg(short, long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Directory for per-day run logs
    #[arg(short, long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Disable the run log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Seed for the story writer's randomness
    #[arg(long)]
    pub seed: Option<u64>,

    /// API key for the delegated story writer
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model override for the delegated story writer
    #[arg(long, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,
}

impl Cli {
    /// The API key, if one was given and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Key and model settings for the delegated writer, or `None` without a
    /// key. The model override only applies when a key is present.
    pub fn delegated_llm(&self, llm: &LlmConfig) -> Option<(&str, LlmConfig)> {
        let key = self.api_key()?;
        let mut llm = llm.clone();
        if let Some(model) = self.openai_model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            llm.model = model.to_string();
        }
        Some((key, llm))
    }
}
