//! HTTP GET with a fixed identity and no failure modes.
//!
//! Every page, feed and article in the pipeline is downloaded through the
//! [`Fetch`] trait. The real implementation, [`HttpFetcher`], never returns
//! an error: connection failures, timeouts and non-2xx statuses are logged
//! and come back as an empty string, which every caller treats as
//! "no data from this call". Nothing is retried.

use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Blocking-style page download used by every scraper and extractor.
pub trait Fetch {
    /// Body of `url` as text, or `""` on any failure.
    async fn get(&self, url: &str) -> String;
}

impl<T: Fetch> Fetch for &T {
    async fn get(&self, url: &str) -> String {
        (**self).get(url).await
    }
}

/// [`Fetch`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout, user agent and language.
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| PipelineError::Config(format!("user_agent: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| PipelineError::Config(format!("accept_language: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    async fn try_get(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> String {
        let t0 = Instant::now();
        match self.try_get(url).await {
            Ok(body) => {
                debug!(
                    bytes = body.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "GET ok"
                );
                body
            }
            Err(e) => {
                warn!(%url, error = %e, "GET fail");
                String::new()
            }
        }
    }
}
