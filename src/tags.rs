//! Heuristic tagging of article bodies.
//!
//! Two passes over the text:
//! - whole-word, case-insensitive matches against the team roster, emitted
//!   in their canonical spelling;
//! - pairs of consecutive capitalised words that occur at least twice, a
//!   cheap stand-in for "named person".
//!
//! False positives ("Head Coach") and misses ("LeBron James" is caught,
//! "Shai Gilgeous-Alexander" is not) are accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Canonical team names matched by [`extract_tags`].
pub const TEAM_KEYWORDS: &[&str] = &[
    "Lakers", "Warriors", "Celtics", "Bucks", "Suns", "Clippers", "Heat", "Knicks", "Nets",
    "76ers", "Mavericks", "Nuggets", "Timberwolves", "Grizzlies", "Pelicans", "Kings", "Thunder",
    "Jazz", "Spurs", "Rockets", "Pistons", "Bulls", "Cavaliers", "Pacers", "Hawks", "Hornets",
    "Raptors", "Magic", "Trail Blazers", "Wizards",
];

static TEAM_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TEAM_KEYWORDS
        .iter()
        .map(|team| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(team));
            (*team, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static CAPITALISED_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+ [A-Z][a-z]+)\b").unwrap());

/// Sorted, deduplicated tags for `body`.
pub fn extract_tags(body: &str) -> Vec<String> {
    let mut tags = BTreeSet::new();

    for (team, pattern) in TEAM_PATTERNS.iter() {
        if pattern.is_match(body) {
            tags.insert((*team).to_string());
        }
    }

    let pairs: BTreeSet<&str> = CAPITALISED_PAIR
        .captures_iter(body)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    for name in pairs {
        if body.matches(name).count() >= 2 {
            tags.insert(name.to_string());
        }
    }

    tags.into_iter().collect()
}
