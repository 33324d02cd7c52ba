//! Template-and-sampling story writer.
//!
//! Always available and deterministic for a given RNG state. Randomness is
//! drawn in a fixed order (lead line, detail shuffle, headline variant) so a
//! seeded RNG reproduces the same story.

use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use regex::Regex;

use crate::author::strip_league_prefix;
use crate::models::Section;

const LEADS: &[&str] = &[
    "It started as a footnote and ended like a headline.",
    "All the little swings added up to something big.",
    "Sometimes the box score lies. This wasn't one of those nights.",
    "The details tell the story; the pace wrote the rhythm.",
];

const NO_DETAIL: &str = "The game swung on tempo, spacing, and a few possessions that stretched longer than they had any right to.";

const TAKEAWAY: &str =
    "**Takeaway:** If the theme was execution, the subtext was nerve. And they had just enough of both.";

/// Sampled detail sentences per story.
const MAX_DETAILS: usize = 3;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());
static SMALL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,3}\b").unwrap());
static BASKETBALL_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(quarter|run|clutch|overtime|contract|trade|injury|defense|offense|shooting|from deep|paint|rim)\b",
    )
    .unwrap()
});

/// Headline, sections and rendered Markdown of a heuristic story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedStory {
    pub headline: String,
    pub sections: Vec<Section>,
    pub markdown: String,
}

/// Split after `.`, `!` or `?` when followed by whitespace.
pub fn split_sentences(body: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(body) {
        sentences.push(&body[start..m.start() + 1]);
        start = m.end();
    }
    if start < body.len() {
        sentences.push(&body[start..]);
    }
    sentences.retain(|s| !s.trim().is_empty());
    sentences
}

/// A sentence worth quoting: it has a small number or game vocabulary.
pub fn is_detail_sentence(sentence: &str) -> bool {
    SMALL_NUMBER.is_match(sentence) || BASKETBALL_TERMS.is_match(sentence)
}

/// Write a story for `title`/`body`, crediting `source_domain`.
pub fn compose<R: Rng + ?Sized>(title: &str, body: &str, source_domain: &str, rng: &mut R) -> ComposedStory {
    let lead = LEADS.choose(rng).copied().unwrap_or(LEADS[0]);

    let mut details: Vec<&str> = split_sentences(body)
        .into_iter()
        .filter(|s| is_detail_sentence(s))
        .collect();
    details.shuffle(rng);
    let detail_block = if details.is_empty() {
        NO_DETAIL.to_string()
    } else {
        details.iter().take(MAX_DETAILS).join(" ")
    };

    let core = strip_league_prefix(title);
    let headlines = [
        format!("{core} — What Actually Mattered"),
        format!("{core}: Beyond the Box Score"),
        format!("{core} (Here's the Real Story)"),
        format!("Inside: {core}"),
    ];
    let headline = headlines.choose(rng).cloned().unwrap_or_else(|| core.clone());

    let sections = vec![
        section("The Pulse", format!("{lead} {detail_block}")),
        section(
            "The Turning Point",
            "Momentum didn't flip all at once. It frayed, one possession, one coverage, one substitution at a time.",
        ),
        section(
            "Who Tilted the Floor",
            "Certain matchups bent the geometry. A hot hand, a cold closeout, and a coach leaning into what the night was giving.",
        ),
        section(
            "What It Means Next",
            "One result rarely rewrites a season, but it can redraw the margins. This one nudges them.",
        ),
    ];

    let markdown = render_markdown(&headline, &sections, source_domain);
    ComposedStory {
        headline,
        sections,
        markdown,
    }
}

fn section(heading: &str, paragraph: impl Into<String>) -> Section {
    Section {
        heading: heading.to_string(),
        paragraph: paragraph.into(),
    }
}

/// Markdown body: headline, sourcing note, sections, takeaway.
pub fn render_markdown(headline: &str, sections: &[Section], source_domain: &str) -> String {
    let mut lines = vec![
        format!("# {headline}"),
        String::new(),
        format!(
            "*Sourced from reporting across {source_domain} and public coverage. Analysis and original writing below.*"
        ),
        String::new(),
    ];
    for s in sections {
        lines.push(format!("## {}", s.heading));
        lines.push(s.paragraph.clone());
        lines.push(String::new());
    }
    lines.push(TAKEAWAY.to_string());
    lines.join("\n")
}
