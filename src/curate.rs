//! Recency and extraction filter.
//!
//! Walks the deduplicated candidates in order and turns the survivors into
//! [`CuratedItem`]s:
//!
//! 1. Items older than the recency window are dropped without any fetch.
//!    Items with no timestamp are kept.
//! 2. Links into a configured outer (search-result) host are followed once
//!    and replaced by the first external link on that page.
//! 3. The article body is pulled through the [`ArticleExtractor`] cascade
//!    and must reach the minimum length.
//!
//! Curation stops as soon as `max_articles` items are curated, so later
//! candidates are never fetched. Failures only ever drop the current item.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::PipelineConfig;
use crate::extract::ArticleExtractor;
use crate::fetch::Fetch;
use crate::models::{CandidateItem, CuratedItem};
use crate::utils::host_of;

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Whether an item published at `published_at` is still inside the window.
///
/// The boundary itself counts as recent; unknown timestamps always do.
pub fn within_recent(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) -> bool {
    match published_at {
        Some(ts) => now - ts <= window,
        None => true,
    }
}

/// Whether `host` is `outer` or one of its subdomains.
fn host_matches(host: &str, outer: &str) -> bool {
    host == outer || host.ends_with(&format!(".{outer}"))
}

/// First absolute link on an outer page that leaves the outer host.
///
/// Best effort: the first such link may be navigation or an ad. It is
/// accepted without further checks.
pub fn first_external_link(html: &str, outer: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&LINKS)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| {
            let Ok(url) = Url::parse(href) else {
                return false;
            };
            matches!(url.scheme(), "http" | "https")
                && url
                    .host_str()
                    .is_some_and(|h| !host_matches(&h.to_lowercase(), outer))
        })
        .map(str::to_string)
}

/// Applies the recency window, link resolution and extraction cascade.
#[derive(Debug)]
pub struct Curator<'a, F> {
    fetcher: &'a F,
    config: &'a PipelineConfig,
    now: DateTime<Utc>,
}

impl<'a, F: Fetch> Curator<'a, F> {
    /// `now` is the reference instant for the recency window.
    pub fn new(fetcher: &'a F, config: &'a PipelineConfig, now: DateTime<Utc>) -> Self {
        Self { fetcher, config, now }
    }

    /// Curate `items` in order, stopping at the configured cap.
    #[instrument(level = "info", skip_all, fields(candidates = items.len(), cap = self.config.max_articles))]
    pub async fn curate(&self, items: Vec<CandidateItem>) -> Vec<CuratedItem> {
        let window = Duration::hours(self.config.recent_hours);
        let mut curated = Vec::new();
        let mut stale = 0usize;
        let mut too_short = 0usize;

        for item in items {
            if curated.len() >= self.config.max_articles {
                break;
            }
            if !within_recent(item.published_at(), self.now, window) {
                debug!(title = %item.title(), "Dropping stale item");
                stale += 1;
                continue;
            }
            match self.curate_one(item).await {
                Some(c) => curated.push(c),
                None => too_short += 1,
            }
        }

        info!(
            curated = curated.len(),
            stale,
            dropped_extraction = too_short,
            "Curated items"
        );
        curated
    }

    /// Resolve and extract one recent item.
    #[instrument(level = "debug", skip_all, fields(url = %item.url()))]
    async fn curate_one(&self, mut item: CandidateItem) -> Option<CuratedItem> {
        self.resolve_outer_link(&mut item).await;

        let extractor = ArticleExtractor::new(self.fetcher);
        let Some(body) = extractor.extract_fulltext(item.url()).await else {
            debug!("No body extracted; dropping item");
            return None;
        };

        let chars = body.chars().count();
        if chars < self.config.min_body_chars {
            debug!(chars, min = self.config.min_body_chars, "Body too short; dropping item");
            return None;
        }
        Some(item.into_curated(body))
    }

    /// Replace a search-result link with the article it points to, if found.
    async fn resolve_outer_link(&self, item: &mut CandidateItem) {
        let Some(host) = host_of(item.url()) else {
            return;
        };
        let Some(outer) = self
            .config
            .outer_domains
            .iter()
            .find(|outer| host_matches(&host, &outer.to_lowercase()))
        else {
            return;
        };

        let html = self.fetcher.get(item.url()).await;
        if html.is_empty() {
            return;
        }
        if let Some(target) = first_external_link(&html, &outer.to_lowercase()) {
            debug!(from = %item.url(), to = %target, "Resolved outer link");
            item.rewrite_url(target);
        }
    }
}
