//! The per-day `index.json` manifest.
//!
//! A pretty-printed JSON array with one [`ManifestEntry`] per story written
//! in the run, in curation order. Paths are relative to the site directory
//! so the manifest stays valid when the site is moved.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::models::{AuthoredStory, CuratedItem, ManifestEntry, format_timestamp};

/// Manifest entry for a story written to `path` (site-relative).
pub fn manifest_entry(item: &CuratedItem, story: &AuthoredStory, path: String) -> ManifestEntry {
    ManifestEntry {
        slug: story.slug.clone(),
        title: item.title().to_string(),
        path,
        published_at: item.published_at().map(format_timestamp),
        source_url: item.url().to_string(),
        domain: item.domain().to_string(),
        tags: story.tags.clone(),
    }
}

/// Write `entries` to `<day_dir>/index.json` and return its path.
#[instrument(level = "info", skip_all, fields(entries = entries.len()))]
pub async fn write_manifest(day_dir: &Path, entries: &[ManifestEntry]) -> Result<PathBuf, PipelineError> {
    let json = serde_json::to_string_pretty(entries)?;
    let path = day_dir.join("index.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote manifest");
    Ok(path)
}

/// Read a manifest written by [`write_manifest`].
#[cfg(test)]
pub async fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, PipelineError> {
    let text = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateItem, SourceKind};

    #[tokio::test]
    async fn test_manifest_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let item = CandidateItem::new(SourceKind::Forum, "Heat Win", "https://www.nba.com/heat")
            .into_curated("Body.".to_string());
        let story = AuthoredStory {
            headline: "Heat Win".to_string(),
            sections: Vec::new(),
            tags: vec!["Heat".to_string()],
            slug: "heat-win".to_string(),
            markdown: String::new(),
        };
        let entry = manifest_entry(&item, &story, "content/2025-06-10/heat-win.md".to_string());
        assert_eq!(entry.domain, "nba.com");
        assert_eq!(entry.published_at, None);

        let path = write_manifest(tmp.path(), std::slice::from_ref(&entry)).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"slug\": \"heat-win\""));
        assert!(text.contains("\"published_at\": null"));
        assert_eq!(read_manifest(&path).await.unwrap(), vec![entry]);
    }
}
