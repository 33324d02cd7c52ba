//! Append-only JSONL log of curated items, shared across runs.

use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::models::CuratedItem;

pub const RAW_LOG_FILE: &str = "articles_raw.jsonl";

/// Append one JSON line per item to `<data_dir>/articles_raw.jsonl`.
#[instrument(level = "info", skip_all, fields(items = items.len()))]
pub async fn append_items(data_dir: &Path, items: &[CuratedItem]) -> Result<PathBuf, PipelineError> {
    let mut buf = String::new();
    for item in items {
        buf.push_str(&serde_json::to_string(item)?);
        buf.push('\n');
    }

    let path = data_dir.join(RAW_LOG_FILE);
    let mut file = OpenOptions::new().create(true).append(true).open(&path).await?;
    file.write_all(buf.as_bytes()).await?;
    file.flush().await?;
    info!(path = %path.display(), "Appended raw items");
    Ok(path)
}
