//! RSS, Atom and JSON Feed producer.
//!
//! Feeds are downloaded through [`Fetch`] and parsed with `feed-rs`, which
//! understands namespaced extensions (Media RSS, `atom:link`, Dublin Core)
//! and normalises every timestamp it can read to UTC. A malformed feed
//! yields no entries rather than an error, and an unreadable timestamp
//! leaves `published_at` empty.

use feed_rs::model::{Entry, Link};
use tracing::{debug, info, instrument, warn};

use crate::fetch::Fetch;
use crate::models::{CandidateItem, SourceKind};
use crate::utils::{norm_space, strip_html};

/// Parse a feed document. Anything unparseable yields no entries.
pub fn parse_feed(xml: &str) -> Vec<Entry> {
    let xml = scrub_html_entities_for_xml(xml);
    match feed_rs::parser::parse(xml.as_bytes()) {
        Ok(feed) => feed.entries,
        Err(e) => {
            warn!(error = %e, "Feed could not be parsed");
            Vec::new()
        }
    }
}

/// The article link of an entry: an `alternate` (or untyped) link, else the
/// first link, else an `http` id.
fn entry_link(entry: &Entry) -> Option<String> {
    let is_article = |l: &&Link| matches!(l.rel.as_deref(), None | Some("alternate"));
    entry
        .links
        .iter()
        .find(is_article)
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))
}

/// Turn feed entries into candidates, skipping any without title or link.
pub fn entries_to_items(feed_url: &str, entries: Vec<Entry>) -> Vec<CandidateItem> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let title = norm_space(entry.title.as_ref().map(|t| t.content.as_str()).unwrap_or_default());
            let link = entry_link(&entry).map(|l| l.trim().to_string()).unwrap_or_default();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            let published_at = entry.published.or(entry.updated);
            let summary = entry.summary.as_ref().map(|s| strip_html(&s.content));

            Some(
                CandidateItem::new(SourceKind::Feed, title, link)
                    .with_feed(feed_url)
                    .with_published_at(published_at)
                    .with_summary(summary),
            )
        })
        .collect()
}

/// Download one feed and return its entries as candidates.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_feed<F: Fetch>(fetcher: &F, feed_url: &str) -> Vec<CandidateItem> {
    let xml = fetcher.get(feed_url).await;
    if xml.is_empty() {
        debug!("Feed fetch returned nothing");
        return Vec::new();
    }
    let items = entries_to_items(feed_url, parse_feed(&xml));
    info!(count = items.len(), "Parsed feed");
    items
}

/// Replace HTML-only entities that make otherwise valid feeds invalid XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
