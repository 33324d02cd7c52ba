//! Story authoring.
//!
//! A [`Storyteller`] turns a curated item into an [`AuthoredStory`] using
//! one of two strategies, chosen once per run:
//!
//! - [`Strategy::Heuristic`]: templates plus sampled detail sentences
//!   ([`heuristic`]). Always available.
//! - [`Strategy::Delegated`]: a generative text service ([`delegated`]).
//!   Any failure is logged and the heuristic writer takes over with the same
//!   RNG, so the run never depends on the service being up.

pub mod delegated;
pub mod heuristic;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::api::AskAsync;
use crate::models::{AuthoredStory, CuratedItem};

static LEAGUE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^nba\b\s*:?\s*").unwrap());

/// Title with any leading `NBA` / `NBA:` label removed.
pub fn strip_league_prefix(title: &str) -> String {
    LEAGUE_PREFIX.replace(title.trim(), "").to_string()
}

/// Which writer produces the stories of a run.
#[derive(Debug)]
pub enum Strategy<A> {
    Heuristic,
    Delegated(A),
}

/// Writes stories with the run's strategy and RNG.
#[derive(Debug)]
pub struct Storyteller<A> {
    strategy: Strategy<A>,
    rng: StdRng,
    max_source_chars: usize,
}

impl<A: AskAsync> Storyteller<A> {
    /// `max_source_chars` bounds the body excerpt sent to a delegated writer.
    pub fn new(strategy: Strategy<A>, rng: StdRng, max_source_chars: usize) -> Self {
        Self {
            strategy,
            rng,
            max_source_chars,
        }
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self.strategy, Strategy::Delegated(_))
    }

    /// Write the story for `item`, carrying the already computed tags and slug.
    #[instrument(level = "info", skip_all, fields(%slug))]
    pub async fn author(&mut self, item: &CuratedItem, tags: Vec<String>, slug: String) -> AuthoredStory {
        if let Strategy::Delegated(client) = &self.strategy {
            match delegated::write(client, item.title(), item.body(), item.domain(), self.max_source_chars).await {
                Ok(markdown) => {
                    debug!("Delegated writer produced story");
                    return AuthoredStory {
                        headline: strip_league_prefix(item.title()),
                        sections: Vec::new(),
                        tags,
                        slug,
                        markdown,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "LLM writer failed, falling back to rule-based");
                }
            }
        }

        let composed = heuristic::compose(item.title(), item.body(), item.domain(), &mut self.rng);
        AuthoredStory {
            headline: composed.headline,
            sections: composed.sections,
            tags,
            slug,
            markdown: composed.markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateItem, SourceKind};
    use crate::test_support::{CannedAsk, FailingAsk, long_body};
    use rand::SeedableRng;

    fn lakers() -> CuratedItem {
        CandidateItem::new(SourceKind::Feed, "NBA: Lakers Rally", "https://example.com/lakers")
            .into_curated(long_body(900).trim().to_string())
    }

    #[test]
    fn test_strip_league_prefix() {
        assert_eq!(strip_league_prefix("NBA: Lakers Rally"), "Lakers Rally");
        assert_eq!(strip_league_prefix("nba Lakers Rally"), "Lakers Rally");
        assert_eq!(strip_league_prefix("  NBA:Lakers"), "Lakers");
        assert_eq!(strip_league_prefix("NBAers Unite"), "NBAers Unite");
        assert_eq!(strip_league_prefix("Lakers beat the NBA: champs"), "Lakers beat the NBA: champs");
    }

    #[tokio::test]
    async fn test_failed_delegate_matches_heuristic_output() {
        let item = lakers();

        let mut heuristic: Storyteller<FailingAsk> =
            Storyteller::new(Strategy::Heuristic, StdRng::seed_from_u64(42), 4500);
        let mut delegated = Storyteller::new(Strategy::Delegated(FailingAsk), StdRng::seed_from_u64(42), 4500);
        assert!(delegated.is_delegated());

        let expected = heuristic.author(&item, vec!["Lakers".into()], "lakers-rally".into()).await;
        let actual = delegated.author(&item, vec!["Lakers".into()], "lakers-rally".into()).await;
        assert_eq!(actual, expected);
        assert!(actual.headline.contains("Lakers Rally"));
        assert!(!actual.headline.contains("NBA:"));
    }

    #[tokio::test]
    async fn test_successful_delegate_is_used_verbatim() {
        let item = lakers();
        let mut teller = Storyteller::new(
            Strategy::Delegated(CannedAsk("Written elsewhere.".to_string())),
            StdRng::seed_from_u64(1),
            4500,
        );
        let story = teller.author(&item, Vec::new(), "lakers-rally".into()).await;
        assert_eq!(story.markdown, "Written elsewhere.");
        assert_eq!(story.headline, "Lakers Rally");
        assert!(story.sections.is_empty());
    }

    #[tokio::test]
    async fn test_heuristic_story_carries_tags_and_slug() {
        let item = lakers();
        let mut teller: Storyteller<FailingAsk> =
            Storyteller::new(Strategy::Heuristic, StdRng::seed_from_u64(5), 4500);
        let story = teller.author(&item, vec!["Lakers".into()], "lakers-rally".into()).await;
        assert_eq!(story.tags, ["Lakers"]);
        assert_eq!(story.slug, "lakers-rally");
        assert_eq!(story.sections.len(), 4);
    }
}
