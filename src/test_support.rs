//! In-memory stand-ins for the network collaborators.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::AskAsync;
use crate::error::AskError;
use crate::fetch::Fetch;

/// Serves canned pages and records every URL requested.
///
/// A URL may have several responses; they are served in order and the last
/// one repeats.
#[derive(Debug, Default)]
pub struct StubFetcher {
    pages: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), vec![body.into()]);
        self
    }

    pub fn with_responses(mut self, url: &str, bodies: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), bodies.iter().map(|b| b.to_string()).collect());
        self
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `url` was requested.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl Fetch for StubFetcher {
    async fn get(&self, url: &str) -> String {
        let served = self.calls_to(url);
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .and_then(|bodies| bodies.get(served).or_else(|| bodies.last()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Delegated writer that always fails.
#[derive(Debug, Default)]
pub struct FailingAsk;

impl AskAsync for FailingAsk {
    async fn ask(&self, _prompt: &str) -> Result<String, AskError> {
        Err(AskError::EmptyResponse)
    }
}

/// Delegated writer that answers with a fixed text.
#[derive(Debug)]
pub struct CannedAsk(pub String);

impl AskAsync for CannedAsk {
    async fn ask(&self, _prompt: &str) -> Result<String, AskError> {
        Ok(self.0.clone())
    }
}

/// A page whose `<article>` holds `body` as one paragraph, behind a nav menu.
pub fn article_page(body: &str) -> String {
    format!("<html><body><nav><p>Menu</p></nav><article><p>{body}</p></article></body></html>")
}

/// A body of at least `chars` characters that mentions a score.
pub fn long_body(chars: usize) -> String {
    let sentence = "The Lakers closed on a 12-2 run in the fourth quarter. ";
    sentence.repeat(chars / sentence.len() + 1)
}
