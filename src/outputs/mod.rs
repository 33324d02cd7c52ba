//! Flat-file outputs of a run.
//!
//! # Submodules
//!
//! - [`slug`]: filename-safe slugs, unique within a run
//! - [`markdown`]: one front-matter document per story
//! - [`json`]: the per-day `index.json` manifest
//! - [`raw_log`]: append-only JSONL record of every curated item
//!
//! # Output Structure
//!
//! ```text
//! site_dir/
//! └── content/
//!     └── 2025-05-06/
//!         ├── lakers-rally.md
//!         ├── celtics-extend-coach.md
//!         └── index.json
//!
//! data_dir/
//! └── articles_raw.jsonl
//! ```

pub mod json;
pub mod markdown;
pub mod raw_log;
pub mod slug;

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::utils::ensure_writable_dir;

/// Prepared output locations, created and probed before the run starts.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    site: PathBuf,
    content: PathBuf,
    data: PathBuf,
}

impl OutputDirs {
    /// Create `site/`, `site/content/` and `data/` and check each is writable.
    #[instrument(level = "info", skip_all, fields(site = %site.as_ref().display(), data = %data.as_ref().display()))]
    pub async fn prepare(site: impl AsRef<Path>, data: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let site = site.as_ref().to_path_buf();
        let content = site.join("content");
        let data = data.as_ref().to_path_buf();

        for dir in [&site, &content, &data] {
            ensure_writable_dir(dir).await?;
        }
        Ok(Self { site, content, data })
    }

    pub fn site(&self) -> &Path {
        &self.site
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    /// `content/<YYYY-MM-DD>` for the UTC day of `now`. Not created.
    pub fn day_dir(&self, now: DateTime<Utc>) -> PathBuf {
        self.content.join(now.format("%Y-%m-%d").to_string())
    }

    /// Create the day directory for `now` and return it.
    pub async fn create_day_dir(&self, now: DateTime<Utc>) -> Result<PathBuf, PipelineError> {
        let dir = self.day_dir(now);
        info!(dir = %dir.display(), "Ensuring content directory exists");
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// `path` relative to the site directory, with `/` separators.
    pub fn site_relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.site).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_prepare_creates_all_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::prepare(tmp.path().join("site"), tmp.path().join("data"))
            .await
            .unwrap();
        assert!(dirs.site().join("content").is_dir());
        assert!(dirs.data().is_dir());
    }

    #[tokio::test]
    async fn test_day_dir_and_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = OutputDirs::prepare(tmp.path().join("site"), tmp.path().join("data"))
            .await
            .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 23, 30, 0).unwrap();

        let day = dirs.day_dir(now);
        assert!(!day.exists());
        let created = dirs.create_day_dir(now).await.unwrap();
        assert!(created.is_dir());
        assert_eq!(dirs.site_relative(&created.join("x.md")), "content/2025-06-10/x.md");
    }
}
