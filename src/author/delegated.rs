//! Story writing delegated to a generative text service.

use tracing::instrument;

use crate::api::AskAsync;
use crate::error::AskError;
use crate::utils::truncate_chars;

/// The beat-writer prompt sent with every delegated story.
pub fn build_prompt(title: &str, body: &str, source_domain: &str, max_source_chars: usize) -> String {
    format!(
        r#"You are a seasoned NBA beat writer. Write an original, human-sounding article (450-700 words) based on the source text below.
Avoid generic AI tone. Vary sentence length. Use concrete detail and subtle voice. No listicles.
Title seed: "{title}"
Source domain: {source_domain}
Source text (for facts only):
{}
"#,
        truncate_chars(body, max_source_chars)
    )
}

/// Ask the service for a story; the reply is used verbatim.
#[instrument(level = "info", skip_all, fields(%source_domain))]
pub async fn write<A: AskAsync>(
    client: &A,
    title: &str,
    body: &str,
    source_domain: &str,
    max_source_chars: usize,
) -> Result<String, AskError> {
    let prompt = build_prompt(title, body, source_domain, max_source_chars);
    client.ask(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CannedAsk;

    #[test]
    fn test_prompt_truncates_source_text() {
        let body = "x".repeat(5000);
        let prompt = build_prompt("Lakers Rally", &body, "espn.com", 4500);
        assert!(prompt.contains("Title seed: \"Lakers Rally\""));
        assert!(prompt.contains("Source domain: espn.com"));
        assert_eq!(prompt.matches('x').count(), 4500);
    }

    #[tokio::test]
    async fn test_write_returns_reply_verbatim() {
        let client = CannedAsk("# A Story\n\nText.".to_string());
        let text = write(&client, "T", "B", "d.com", 100).await.unwrap();
        assert_eq!(text, "# A Story\n\nText.");
    }
}
