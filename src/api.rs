//! LLM API interaction.
//!
//! This module talks to an OpenAI-compatible `/chat/completions` endpoint.
//! It is used only by the delegated story writer, which treats every
//! failure as a signal to fall back to the heuristic writer, so nothing here
//! retries.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`ChatClient`]: `reqwest`-backed implementation with fixed sampling
//!   parameters

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::config::LlmConfig;
use crate::error::{AskError, PipelineError};
use crate::utils::truncate_for_log;

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its text response. The
/// seam lets tests substitute canned or failing writers.
pub trait AskAsync {
    /// Send `prompt` and return the model's reply.
    async fn ask(&self, prompt: &str) -> Result<String, AskError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client with the model and sampling fixed at construction.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

impl ChatClient {
    /// Build a client authenticated with `api_key`.
    pub fn new(api_key: &str, config: &LlmConfig) -> Result<Self, PipelineError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| PipelineError::Config(format!("api key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("llm client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AskAsync for ChatClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, AskError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), elapsed_ms = t0.elapsed().as_millis() as u64, "API call failed");
            return Err(AskError::Status {
                status: status.as_u16(),
                message: truncate_for_log(&body, 300),
            });
        }

        let text = parse_chat_response(&body)?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = text.len(),
            "API call succeeded"
        );
        Ok(text)
    }
}

/// Trimmed text of the first choice in a chat completion body.
fn parse_chat_response(body: &str) -> Result<String, AskError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(AskError::EmptyResponse)
}
