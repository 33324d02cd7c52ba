//! Error types for the curation pipeline.
//!
//! Only [`PipelineError`] ever reaches `main`. The other two kinds are
//! recovered where they happen: [`ExtractError`] drops a single item and
//! [`AskError`] switches authoring to the heuristic writer.

use thiserror::Error;

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Filesystem failure while preparing directories or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file or front matter could not be (de)serialized.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Manifest or raw-log record could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values that make a run meaningless.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// One stage of the full-text extraction cascade came up empty.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The fetch returned nothing.
    #[error("page was empty")]
    EmptyPage,

    /// The page had no recognisable article body.
    #[error("no article text found")]
    NoArticleText,
}

/// The delegated writing service could not produce a story.
#[derive(Debug, Error)]
pub enum AskError {
    /// Transport failure, timeout or body decode failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// The response body did not match the chat completion schema.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The response parsed but carried no text.
    #[error("response contained no content")]
    EmptyResponse,
}
