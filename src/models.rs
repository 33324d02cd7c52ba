//! Data models for news items as they move through the pipeline.
//!
//! - [`CandidateItem`]: a raw reference gathered by one of the scrapers
//! - [`CuratedItem`]: a candidate that passed recency and full-text thresholds
//! - [`AuthoredStory`]: the finished piece written for a curated item
//! - [`ManifestEntry`] / [`FrontMatter`]: the on-disk metadata records
//!
//! Field names of the serialized records match the files consumed by the
//! static site, so they must not be renamed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::utils::registrable_domain;

/// Where a candidate item was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// RSS or Atom feed entry.
    #[serde(rename = "rss")]
    Feed,
    /// Search-results page link.
    #[serde(rename = "google_news")]
    Search,
    /// Forum listing post.
    #[serde(rename = "reddit")]
    Forum,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Feed => "rss",
            SourceKind::Search => "google_news",
            SourceKind::Forum => "reddit",
        };
        f.write_str(s)
    }
}

/// A news reference gathered from one source, before any validation.
///
/// `url` and `domain` are private so the two can never drift apart: the
/// domain is derived on construction and recomputed by
/// [`CandidateItem::rewrite_url`], which may run at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateItem {
    source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    feed: Option<String>,
    title: String,
    url: String,
    #[serde(serialize_with = "serialize_timestamp")]
    published_at: Option<DateTime<Utc>>,
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip)]
    rewritten: bool,
}

impl CandidateItem {
    /// Create a candidate. `title` is expected to be whitespace-normalised.
    pub fn new(source: SourceKind, title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let domain = registrable_domain(&url);
        Self {
            source,
            feed: None,
            title: title.into(),
            url,
            published_at: None,
            domain,
            summary: None,
            rewritten: false,
        }
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary.filter(|s| !s.is_empty());
        self
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    #[cfg(test)]
    pub fn feed(&self) -> Option<&str> {
        self.feed.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[cfg(test)]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Point the item at the article behind an indirection page.
    ///
    /// Returns `false` and leaves the item untouched if it was already
    /// rewritten once.
    pub fn rewrite_url(&mut self, url: impl Into<String>) -> bool {
        if self.rewritten {
            return false;
        }
        self.url = url.into();
        self.domain = registrable_domain(&self.url);
        self.rewritten = true;
        true
    }

    /// Attach an extracted body. Only the curation filter calls this, after
    /// checking the length threshold.
    pub(crate) fn into_curated(self, body: String) -> CuratedItem {
        CuratedItem { item: self, body }
    }
}

/// A candidate that passed recency and extraction, with its full body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratedItem {
    #[serde(flatten)]
    item: CandidateItem,
    body: String,
}

impl CuratedItem {
    pub fn item(&self) -> &CandidateItem {
        &self.item
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn title(&self) -> &str {
        self.item.title()
    }

    pub fn url(&self) -> &str {
        self.item.url()
    }

    pub fn domain(&self) -> &str {
        self.item.domain()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.item.published_at()
    }
}

/// One `## heading` block of an authored story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub paragraph: String,
}

/// The finished piece written for one curated item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredStory {
    /// Display headline.
    pub headline: String,
    /// Ordered sections; empty when the text came back from the delegated writer.
    pub sections: Vec<Section>,
    /// Sorted team and player tags.
    pub tags: Vec<String>,
    /// Filesystem-safe identifier, unique within the run.
    pub slug: String,
    /// The rendered story body (Markdown).
    pub markdown: String,
}

/// YAML front matter heading each story document.
#[derive(Debug, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    pub source_url: String,
    pub source_domain: String,
    pub published_at: Option<String>,
    pub fetched_at: String,
    pub tags: Vec<String>,
}

/// One entry of the per-run `index.json` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    /// Document path relative to the site directory.
    pub path: String,
    pub published_at: Option<String>,
    pub source_url: String,
    pub domain: String,
    pub tags: Vec<String>,
}

/// RFC 3339 with an explicit `+00:00` offset, the format the site expects.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn serialize_timestamp<S: Serializer>(
    ts: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_some(&format_timestamp(*ts)),
        None => serializer.serialize_none(),
    }
}
