//! Run configuration.
//!
//! Every knob has a default equal to the production values, so running
//! without `--config` works out of the box. A YAML file may override any
//! subset of fields:
//!
//! ```yaml
//! recent_hours: 24
//! max_articles: 20
//! html_sources:
//!   - name: reddit_nba_hot
//!     kind: forum
//!     url: https://old.reddit.com/r/nba/hot/
//! llm:
//!   model: gpt-4o
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

use crate::error::PipelineError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// What kind of page an HTML source is, which decides how it is scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlSourceKind {
    /// Search-results page whose links point at an indirection page.
    Search,
    /// Forum listing of posts.
    Forum,
}

/// A named HTML page scraped for candidate links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlSource {
    pub name: String,
    pub kind: HtmlSourceKind,
    pub url: String,
}

/// Settings for the delegated writing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root, without the `/chat/completions` suffix.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// How much of the article body is sent along with the prompt.
    pub max_source_chars: usize,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.8,
            top_p: 0.95,
            max_source_chars: 4500,
            timeout_secs: 60,
        }
    }
}

/// Everything the pipeline needs to know besides where to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum age, in hours, of a timestamped item.
    pub recent_hours: i64,
    /// Stop curating once this many items have a body.
    pub max_articles: usize,
    /// Minimum extracted body length, in characters.
    pub min_body_chars: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// RSS/Atom feeds, scraped first and in this order.
    pub feeds: Vec<String>,
    /// HTML pages, scraped after the feeds and in this order.
    pub html_sources: Vec<HtmlSource>,
    /// Hosts whose links are indirection pages in front of the real article.
    pub outer_domains: Vec<String>,
    pub llm: LlmConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recent_hours: 48,
            max_articles: 60,
            min_body_chars: 800,
            http_timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            feeds: vec![
                "https://www.espn.com/espn/rss/nba/news".to_string(),
                "https://www.cbssports.com/rss/headlines/nba/".to_string(),
                "https://sports.yahoo.com/nba/rss.xml".to_string(),
                "https://www.si.com/nba/.rss/full".to_string(),
                "https://www.hoopsrumors.com/feed".to_string(),
            ],
            html_sources: vec![
                HtmlSource {
                    name: "google_news".to_string(),
                    kind: HtmlSourceKind::Search,
                    url: google_news_search_url("NBA"),
                },
                HtmlSource {
                    name: "reddit_nba_hot".to_string(),
                    kind: HtmlSourceKind::Forum,
                    url: "https://old.reddit.com/r/nba/hot/".to_string(),
                },
            ],
            outer_domains: vec!["news.google.com".to_string()],
            llm: LlmConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a YAML file; missing fields take their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        info!(
            feeds = config.feeds.len(),
            html_sources = config.html_sources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_articles == 0 {
            return Err(PipelineError::Config("max_articles must be at least 1".into()));
        }
        if self.recent_hours <= 0 {
            return Err(PipelineError::Config("recent_hours must be positive".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(PipelineError::Config("user_agent must not be empty".into()));
        }
        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(PipelineError::Config(format!(
                "llm.top_p must be in (0, 1], got {}",
                self.llm.top_p
            )));
        }
        Ok(())
    }
}

/// Google News search URL for an English/US query.
pub fn google_news_search_url(query: &str) -> String {
    format!(
        "https://news.google.com/search?q={}&hl=en-US&gl=US&ceid=US:en",
        urlencoding::encode(query)
    )
}
