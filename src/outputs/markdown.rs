//! Story documents: YAML front matter followed by the story markdown.

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::models::{AuthoredStory, CuratedItem, FrontMatter, format_timestamp};

/// Front matter for `story`, written about `item` at `fetched_at`.
pub fn front_matter(item: &CuratedItem, story: &AuthoredStory, fetched_at: DateTime<Utc>) -> FrontMatter {
    FrontMatter {
        title: item.title().to_string(),
        source_url: item.url().to_string(),
        source_domain: item.domain().to_string(),
        published_at: item.published_at().map(format_timestamp),
        fetched_at: fetched_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        tags: story.tags.clone(),
    }
}

/// Full document text: `---`, front matter, `---`, blank line, story.
pub fn render_document(front_matter: &FrontMatter, markdown: &str) -> Result<String, PipelineError> {
    let yaml = serde_yaml::to_string(front_matter)?;
    Ok(format!("---\n{yaml}---\n\n{markdown}\n"))
}

/// Write `<day_dir>/<slug>.md` and return its path.
#[instrument(level = "info", skip_all, fields(slug = %story.slug))]
pub async fn write_story(
    day_dir: &Path,
    item: &CuratedItem,
    story: &AuthoredStory,
    fetched_at: DateTime<Utc>,
) -> Result<PathBuf, PipelineError> {
    let document = render_document(&front_matter(item, story, fetched_at), &story.markdown)?;
    let path = day_dir.join(format!("{}.md", story.slug));
    fs::write(&path, document).await?;
    info!(path = %path.display(), "Wrote story");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateItem, SourceKind};
    use chrono::TimeZone;

    fn item() -> CuratedItem {
        CandidateItem::new(SourceKind::Feed, "NBA: Lakers Rally", "https://www.espn.com/nba/story")
            .with_published_at(Some(Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap()))
            .into_curated("Body text.".to_string())
    }

    fn story() -> AuthoredStory {
        AuthoredStory {
            headline: "Inside: Lakers Rally".to_string(),
            sections: Vec::new(),
            tags: vec!["Lakers".to_string()],
            slug: "nba-lakers-rally".to_string(),
            markdown: "# Inside: Lakers Rally\n\nText.".to_string(),
        }
    }

    #[test]
    fn test_document_layout_and_front_matter_order() {
        let fetched = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let fm = front_matter(&item(), &story(), fetched);
        assert_eq!(fm.fetched_at, "2025-06-10T12:00:00.000000Z");
        assert_eq!(fm.published_at.as_deref(), Some("2025-06-10T08:00:00+00:00"));

        let doc = render_document(&fm, &story().markdown).unwrap();
        assert!(doc.starts_with("---\ntitle: "));
        assert!(doc.ends_with("---\n\n# Inside: Lakers Rally\n\nText.\n"));

        let keys: Vec<usize> = ["title:", "source_url:", "source_domain:", "published_at:", "fetched_at:", "tags:"]
            .iter()
            .map(|k| doc.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_front_matter_parses_back() {
        let fetched = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let doc = render_document(&front_matter(&item(), &story(), fetched), "x").unwrap();
        let yaml = doc.trim_start_matches("---\n").split("---\n").next().unwrap();
        let parsed: FrontMatter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.title, "NBA: Lakers Rally");
        assert_eq!(parsed.source_domain, "espn.com");
        assert_eq!(parsed.tags, ["Lakers"]);
    }

    #[tokio::test]
    async fn test_write_story() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_story(tmp.path(), &item(), &story(), Utc::now()).await.unwrap();
        assert_eq!(path, tmp.path().join("nba-lakers-rally.md"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("---\n"));
        assert!(text.contains("https://www.espn.com/nba/story"));
    }
}
