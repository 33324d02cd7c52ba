//! Full-text extraction cascade.
//!
//! Two stages, each tried only if the previous one failed:
//!
//! 1. **Structured extraction**: fetch the page and read the article body
//!    from JSON-LD `articleBody`, else run Readability main-content
//!    extraction over it.
//! 2. **Paragraph scrape**: fetch the page again and join the text of every
//!    `<p>` on it.
//!
//! The winning text is whitespace-normalised. Thresholds are applied by the
//! caller.

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JsonValue;
use spider_transformations::transformation::content::{
    ReturnFormat, TransformConfig, TransformInput, transform_content_input,
};
use tracing::{debug, instrument};
use url::Url;

use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::utils::norm_space;

static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Runs both extraction stages against pages served by `F`.
#[derive(Debug)]
pub struct ArticleExtractor<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> ArticleExtractor<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Body text of the article at `url`, or `None` if both stages failed.
    #[instrument(level = "debug", skip(self))]
    pub async fn extract_fulltext(&self, url: &str) -> Option<String> {
        let text = match self.structured(url).await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "Structured extraction failed; scraping paragraphs");
                String::new()
            }
        };

        let text = if text.trim().is_empty() {
            match self.paragraphs(url).await {
                Ok(text) => text,
                Err(e) => {
                    debug!(error = %e, "Paragraph scrape failed");
                    return None;
                }
            }
        } else {
            text
        };

        let text = norm_space(&text);
        (!text.is_empty()).then_some(text)
    }

    /// Stage 1.
    pub async fn structured(&self, url: &str) -> Result<String, ExtractError> {
        let html = self.fetcher.get(url).await;
        structured_text(&html, url)
    }

    /// Stage 2, always on a fresh download.
    pub async fn paragraphs(&self, url: &str) -> Result<String, ExtractError> {
        let html = self.fetcher.get(url).await;
        paragraph_text(&html)
    }
}

/// Article body from an already-downloaded page.
///
/// A publisher's JSON-LD `articleBody` is taken as-is. Otherwise the page
/// goes through Readability main-content extraction, which scores the
/// candidate blocks and keeps the story rather than the first container.
pub fn structured_text(html: &str, url: &str) -> Result<String, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyPage);
    }

    let document = Html::parse_document(html);
    let from_json_ld = document
        .select(&JSON_LD)
        .filter_map(|script| serde_json::from_str::<JsonValue>(&script.text().collect::<String>()).ok())
        .find_map(|json| find_article_body(&json).map(str::to_string));
    if let Some(body) = from_json_ld {
        return Ok(body);
    }

    let text = readable_text(html, url);
    if text.trim().is_empty() {
        Err(ExtractError::NoArticleText)
    } else {
        Ok(text)
    }
}

/// Main content of `html` as plain text, via Readability.
fn readable_text(html: &str, url: &str) -> String {
    let parsed_url = Url::parse(url).ok();
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Text,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };
    transform_content_input(input, &config)
}

/// Text of every `<p>` on the page, one per line.
pub fn paragraph_text(html: &str) -> Result<String, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyPage);
    }
    let document = Html::parse_document(html);
    let text = join_paragraphs(document.select(&PARAGRAPHS));
    if text.is_empty() {
        Err(ExtractError::NoArticleText)
    } else {
        Ok(text)
    }
}

/// Visible text of an element, stripped pieces joined with single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>) -> String {
    paragraphs
        .map(element_text)
        .filter(|t| !t.is_empty())
        .join("\n")
}

/// First non-empty `articleBody` in a JSON-LD document, searching arrays,
/// `@graph` and `mainEntityOfPage`.
fn find_article_body(value: &JsonValue) -> Option<&str> {
    match value {
        JsonValue::Array(items) => items.iter().find_map(find_article_body),
        JsonValue::Object(obj) => obj
            .get("articleBody")
            .and_then(JsonValue::as_str)
            .filter(|body| !body.trim().is_empty())
            .or_else(|| obj.get("@graph").and_then(find_article_body))
            .or_else(|| obj.get("mainEntityOfPage").and_then(find_article_body)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubFetcher, article_page, long_body};

    const URL: &str = "https://example.com/story";

    #[test]
    fn test_structured_prefers_json_ld() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[{"@type":"WebPage"},
             {"@type":"NewsArticle","articleBody":"From JSON-LD."}]}
            </script></head><body><article><p>From markup.</p></article></body></html>"#;
        assert_eq!(structured_text(html, URL).unwrap(), "From JSON-LD.");
    }

    #[test]
    fn test_structured_reads_main_content() {
        let body = long_body(900);
        let text = norm_space(&structured_text(&article_page(&body), URL).unwrap());
        assert!(text.contains(body.trim()));
    }

    #[test]
    fn test_structured_skips_related_story_card() {
        let story = long_body(900);
        let html = format!(
            r#"<html><body>
                <div class="story-body"><p>{story}</p><p>{story}</p></div>
                <aside><article class="card"><p>Related: Celtics win.</p></article></aside>
            </body></html>"#
        );
        let text = norm_space(&structured_text(&html, URL).unwrap());
        assert!(text.contains(story.trim()));
        assert!(text.chars().count() >= 800);
    }

    #[test]
    fn test_structured_errors() {
        assert_eq!(structured_text("  ", URL), Err(ExtractError::EmptyPage));
        assert_eq!(
            structured_text("<html><body></body></html>", URL),
            Err(ExtractError::NoArticleText)
        );
    }

    #[test]
    fn test_paragraph_text_collects_every_paragraph() {
        let html = "<p>One</p><div><p> Two  </p></div><p></p>";
        assert_eq!(paragraph_text(html).unwrap(), "One\nTwo");
        assert_eq!(paragraph_text("<div>none</div>"), Err(ExtractError::NoArticleText));
    }

    #[tokio::test]
    async fn test_cascade_uses_first_stage_when_it_succeeds() {
        let body = long_body(900);
        let fetcher = StubFetcher::new().with_page(URL, article_page(&body));
        let extractor = ArticleExtractor::new(&fetcher);
        let text = extractor.extract_fulltext(URL).await.unwrap();
        assert!(text.contains(body.trim()));
        assert_eq!(fetcher.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn test_story_outside_article_card_survives_cascade() {
        let story = long_body(900);
        let page = format!(
            r#"<html><body>
                <div class="story-body"><p>{story}</p></div>
                <aside><article class="card"><p>Related: Celtics win.</p></article></aside>
            </body></html>"#
        );
        let fetcher = StubFetcher::new().with_page(URL, page);
        let extractor = ArticleExtractor::new(&fetcher);
        let text = extractor.extract_fulltext(URL).await.unwrap();
        assert!(text.contains(story.trim()));
        assert!(text.chars().count() >= 800);
    }

    #[tokio::test]
    async fn test_cascade_falls_back_to_fresh_paragraph_scrape() {
        let fetcher = StubFetcher::new().with_responses(URL, &["", "<div><p>Loose one</p><p>Loose two</p></div>"]);
        let extractor = ArticleExtractor::new(&fetcher);
        assert_eq!(
            extractor.extract_fulltext(URL).await.as_deref(),
            Some("Loose one Loose two")
        );
        assert_eq!(fetcher.calls_to(URL), 2);
    }

    #[tokio::test]
    async fn test_cascade_exhausted() {
        let url = "https://example.com/missing";
        let fetcher = StubFetcher::new();
        let extractor = ArticleExtractor::new(&fetcher);
        assert_eq!(extractor.extract_fulltext(url).await, None);
        assert_eq!(fetcher.calls_to(url), 2);
    }
}
