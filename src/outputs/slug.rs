//! Slugs for story filenames.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::utils::fingerprint;

const MAX_SLUG_CHARS: usize = 100;
const CUT_SLUG_CHARS: usize = 96;
/// Leaves room for a `-<hash>` suffix and `.md` under the 255-byte
/// filename limit.
const MAX_SLUG_BYTES: usize = 200;
const HASH_CHARS: usize = 10;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Lower-case, hyphen-separated form of `title`. May be empty.
pub fn to_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    let slug = SEPARATORS.replace_all(cleaned.trim(), "-").to_string();
    let slug: String = if slug.chars().count() > MAX_SLUG_CHARS {
        slug.chars().take(CUT_SLUG_CHARS).collect()
    } else {
        slug
    };
    truncate_bytes(&slug, MAX_SLUG_BYTES).to_string()
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}

/// Short stable hash of a URL.
pub fn url_hash(url: &str) -> String {
    fingerprint(url)[..HASH_CHARS].to_string()
}

/// Hands out slugs that are unique within one run.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for a story titled `title` at `url`.
    ///
    /// Empty slugs become the URL hash; a slug already handed out gets the
    /// URL hash appended.
    pub fn assign(&mut self, title: &str, url: &str) -> String {
        let base = to_slug(title);
        let mut slug = if base.is_empty() { url_hash(url) } else { base };
        if self.used.contains(&slug) {
            slug = format!("{slug}-{}", url_hash(url));
        }
        self.used.insert(slug.clone());
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slug() {
        assert_eq!(to_slug("NBA: Lakers Rally"), "nba-lakers-rally");
        assert_eq!(to_slug("  Warriors -- Win _ Big!  "), "warriors-win-big");
        assert_eq!(to_slug("Jokić's 30-point night"), "jokićs-30-point-night");
        assert_eq!(to_slug("?!"), "");
    }

    #[test]
    fn test_long_slug_is_cut() {
        let slug = to_slug(&"a".repeat(120));
        assert_eq!(slug.len(), 96);
        assert_eq!(to_slug(&"b".repeat(100)).len(), 100);
    }

    #[test]
    fn test_non_ascii_slug_fits_a_filename() {
        let slug = to_slug(&"湖人".repeat(60));
        assert!(slug.len() <= MAX_SLUG_BYTES);
        assert_eq!(slug.chars().count(), 66);

        let mut registry = SlugRegistry::new();
        registry.assign(&"湖人".repeat(60), "https://example.com/1");
        let suffixed = registry.assign(&"湖人".repeat(60), "https://example.com/2");
        assert!(format!("{suffixed}.md").len() <= 255);
    }

    #[test]
    fn test_registry_falls_back_to_hash_and_disambiguates() {
        let mut registry = SlugRegistry::new();
        let empty = registry.assign("!!!", "https://example.com/a");
        assert_eq!(empty.len(), 10);
        assert!(empty.chars().all(|c| c.is_ascii_hexdigit()));

        let first = registry.assign("Lakers Rally", "https://example.com/1");
        let second = registry.assign("Lakers Rally!", "https://example.com/2");
        assert_eq!(first, "lakers-rally");
        assert_eq!(second, format!("lakers-rally-{}", url_hash("https://example.com/2")));
    }
}
