//! Forum listing producer (old.reddit.com markup).
//!
//! Each post is a `div.thing` whose `a.title` holds the headline. Links are
//! either external articles or relative self-post paths, which are resolved
//! against the listing URL.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::HtmlSource;
use crate::extract::element_text;
use crate::fetch::Fetch;
use crate::models::{CandidateItem, SourceKind};
use crate::utils::norm_space;

static POSTS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.thing").unwrap());
static POST_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("a.title").unwrap());

/// Extract posts from a downloaded listing page.
pub fn parse_forum_page(html: &str, page_url: &str) -> Vec<CandidateItem> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&POSTS)
        .filter_map(|post| {
            let anchor = post.select(&POST_TITLE).next()?;
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let link = base.join(href).ok()?;
            let title = norm_space(&element_text(anchor));
            (!title.is_empty()).then(|| CandidateItem::new(SourceKind::Forum, title, link.to_string()))
        })
        .collect()
}

/// Download the listing for `source` and return its posts.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
pub async fn fetch_forum_page<F: Fetch>(fetcher: &F, source: &HtmlSource) -> Vec<CandidateItem> {
    let html = fetcher.get(&source.url).await;
    if html.is_empty() {
        debug!("Forum page fetch returned nothing");
        return Vec::new();
    }
    let items = parse_forum_page(&html, &source.url);
    info!(count = items.len(), "Indexed forum posts");
    items
}
