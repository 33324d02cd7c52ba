//! Search-results page producer.
//!
//! Result links on the page are relative (`./articles/...`) and point at an
//! indirection page on the search host, not at the article itself. They are
//! resolved against the page URL here; the curation filter follows them to
//! the real article later. Search pages carry no timestamps.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::HtmlSource;
use crate::extract::element_text;
use crate::fetch::Fetch;
use crate::models::{CandidateItem, SourceKind};
use crate::utils::norm_space;

static RESULT_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href^='./articles']").unwrap());

/// Extract result links from a downloaded search page.
pub fn parse_search_page(html: &str, page_url: &str) -> Vec<CandidateItem> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&RESULT_LINKS)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let link = base.join(href).ok()?;
            let title = norm_space(&element_text(a));
            (!title.is_empty()).then(|| CandidateItem::new(SourceKind::Search, title, link.to_string()))
        })
        .collect()
}

/// Download the search page for `source` and return its result links.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
pub async fn fetch_search_page<F: Fetch>(fetcher: &F, source: &HtmlSource) -> Vec<CandidateItem> {
    let html = fetcher.get(&source.url).await;
    if html.is_empty() {
        debug!("Search page fetch returned nothing");
        return Vec::new();
    }
    let items = parse_search_page(&html, &source.url);
    info!(count = items.len(), "Indexed search results");
    items
}
