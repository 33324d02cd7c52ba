//! Source aggregation: turn every configured source into candidate items.
//!
//! # Supported Sources
//!
//! | Kind | Module | Method | Timestamps |
//! |------|--------|--------|------------|
//! | RSS/Atom feeds | [`feeds`] | XML parsing | `pubDate` / `published` / `updated` |
//! | Search-results page | [`search`] | HTML scraping | none |
//! | Forum listing | [`forum`] | HTML scraping | none |
//!
//! # Ordering
//!
//! The output is every feed in declared order, then every HTML source in
//! declared order. Deduplication keeps the first occurrence, so this order
//! decides which copy of a story survives.
//!
//! # Failure Isolation
//!
//! A source that cannot be fetched or parsed contributes nothing; it never
//! aborts the others.

pub mod feeds;
pub mod forum;
pub mod search;

use tracing::{info, instrument};

use crate::config::{HtmlSourceKind, PipelineConfig};
use crate::fetch::Fetch;
use crate::models::CandidateItem;

/// Gather candidates from every feed, then every HTML source.
#[instrument(level = "info", skip_all)]
pub async fn aggregate<F: Fetch>(fetcher: &F, config: &PipelineConfig) -> Vec<CandidateItem> {
    let mut items = Vec::new();

    for feed_url in &config.feeds {
        items.extend(feeds::fetch_feed(fetcher, feed_url).await);
    }
    let from_feeds = items.len();

    for source in &config.html_sources {
        let found = match source.kind {
            HtmlSourceKind::Search => search::fetch_search_page(fetcher, source).await,
            HtmlSourceKind::Forum => forum::fetch_forum_page(fetcher, source).await,
        };
        items.extend(found);
    }

    info!(
        total = items.len(),
        from_feeds,
        from_pages = items.len() - from_feeds,
        "Aggregated candidate items"
    );
    items
}
