//! Cross-source deduplication.
//!
//! Two candidates are the same story when their normalised, lower-cased
//! title and their registrable domain match. The same headline on two
//! different domains stays as two stories. Items with an empty title or
//! domain never match anything.

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::models::CandidateItem;
use crate::utils::{fingerprint, norm_space};

/// Identity key of a candidate, or `None` if it has no usable identity.
pub fn identity_key(item: &CandidateItem) -> Option<String> {
    let title = norm_space(item.title());
    if title.is_empty() || item.domain().is_empty() {
        return None;
    }
    Some(fingerprint(&format!("{}|{}", title, item.domain()).to_lowercase()))
}

/// Drop later copies of the same story, keeping the first occurrence.
#[instrument(level = "info", skip_all, fields(input = items.len()))]
pub fn dedupe(items: Vec<CandidateItem>) -> Vec<CandidateItem> {
    let mut seen = HashSet::new();
    let before = items.len();

    let kept: Vec<CandidateItem> = items
        .into_iter()
        .filter(|item| match identity_key(item) {
            Some(key) => {
                let fresh = seen.insert(key);
                if !fresh {
                    debug!(title = %item.title(), domain = %item.domain(), "Dropping duplicate");
                }
                fresh
            }
            None => true,
        })
        .collect();

    info!(kept = kept.len(), dropped = before - kept.len(), "Deduplicated candidates");
    kept
}
