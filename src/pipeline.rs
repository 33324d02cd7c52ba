//! One end-to-end run: aggregate, dedupe, curate, author, write.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::api::AskAsync;
use crate::author::Storyteller;
use crate::config::PipelineConfig;
use crate::curate::Curator;
use crate::dedup::dedupe;
use crate::error::PipelineError;
use crate::fetch::Fetch;
use crate::outputs::slug::SlugRegistry;
use crate::outputs::{OutputDirs, json, markdown, raw_log};
use crate::scrapers::aggregate;
use crate::tags::extract_tags;

/// Counts and output locations of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub candidates: usize,
    pub unique: usize,
    pub curated: usize,
    /// `None` when nothing was curated and nothing was written.
    pub content_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// The pipeline with its collaborators injected.
#[derive(Debug)]
pub struct Pipeline<F, A> {
    config: PipelineConfig,
    fetcher: F,
    storyteller: Storyteller<A>,
    dirs: OutputDirs,
}

impl<F: Fetch, A: AskAsync> Pipeline<F, A> {
    pub fn new(config: PipelineConfig, fetcher: F, storyteller: Storyteller<A>, dirs: OutputDirs) -> Self {
        Self {
            config,
            fetcher,
            storyteller,
            dirs,
        }
    }

    /// Run once with `now` as the reference instant for recency and dating.
    #[instrument(level = "info", skip_all, fields(now = %now))]
    pub async fn run(&mut self, now: DateTime<Utc>) -> Result<RunReport, PipelineError> {
        info!(delegated = self.storyteller.is_delegated(), "Start scrape");
        let candidates = aggregate(&self.fetcher, &self.config).await;
        let candidate_count = candidates.len();

        let unique = dedupe(candidates);
        let unique_count = unique.len();

        let curated = Curator::new(&self.fetcher, &self.config, now).curate(unique).await;
        let mut report = RunReport {
            candidates: candidate_count,
            unique: unique_count,
            curated: curated.len(),
            content_dir: None,
            manifest: None,
        };
        if curated.is_empty() {
            info!("No curated items this run.");
            return Ok(report);
        }

        let day_dir = self.dirs.create_day_dir(now).await?;
        let mut slugs = SlugRegistry::new();
        let mut entries = Vec::with_capacity(curated.len());

        for item in &curated {
            let tags = extract_tags(item.body());
            let slug = slugs.assign(item.title(), item.url());
            let story = self.storyteller.author(item, tags, slug).await;
            let path = markdown::write_story(&day_dir, item, &story, Utc::now()).await?;
            entries.push(json::manifest_entry(item, &story, self.dirs.site_relative(&path)));
        }

        let manifest = json::write_manifest(&day_dir, &entries).await?;
        raw_log::append_items(self.dirs.data(), &curated).await?;

        info!(
            candidates = report.candidates,
            unique = report.unique,
            stories = entries.len(),
            dir = %day_dir.display(),
            "Run complete"
        );
        report.content_dir = Some(day_dir);
        report.manifest = Some(manifest);
        Ok(report)
    }
}
