//! Small text, URL and filesystem helpers shared by every stage.
//!
//! - Whitespace normalisation and HTML-to-text flattening
//! - Content fingerprints for deduplication and slug fallbacks
//! - Registrable-domain derivation for item provenance
//! - Output directory validation

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use sha2::{Digest, Sha256};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::error::PipelineError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Second-level labels that sit under a country code as part of a public
/// suffix (`bbc.co.uk`, `abc.net.au`).
const SECOND_LEVEL_SUFFIXES: &[&str] = &["co", "com", "org", "net", "gov", "ac", "edu"];

/// Collapse every run of whitespace to a single space and trim the ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(norm_space("  Warriors \n Win\tBig  "), "Warriors Win Big");
/// ```
pub fn norm_space(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Flatten an HTML fragment (feed summaries are often markup) to plain text.
pub fn strip_html(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    norm_space(&doc.root_element().text().collect::<Vec<_>>().join(" "))
}

/// Hex-encoded SHA-256 of `s`.
pub fn fingerprint(s: &str) -> String {
    hex::encode(Sha256::digest(s.as_bytes()))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// The first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        None => s,
        Some((cut, _)) => &s[..cut],
    }
}

/// Lower-cased host of `url`, or `None` for relative or host-less URLs.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Registrable domain of `url` (`"https://www.espn.com/nba/x"` -> `"espn.com"`).
///
/// Without a public-suffix list this keeps the last two host labels, or the
/// last three when the host ends in a `<second-level>.<cc>` suffix such as
/// `co.uk`. IP hosts are returned as-is. Unparseable URLs yield `""`.
pub fn registrable_domain(url: &str) -> String {
    let Some(host) = host_of(url) else {
        return String::new();
    };
    let host = host.trim_start_matches("www.");
    if host.parse::<std::net::IpAddr>().is_ok() || host.starts_with('[') {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let keep = match labels.as_slice() {
        [.., sld, cc]
            if labels.len() >= 3 && cc.len() == 2 && SECOND_LEVEL_SUFFIXES.contains(sld) =>
        {
            3
        }
        _ => 2,
    };
    labels[labels.len().saturating_sub(keep)..].join(".")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_space() {
        assert_eq!(norm_space("  Warriors \n Win\tBig  "), "Warriors Win Big");
        assert_eq!(norm_space(""), "");
        assert_eq!(norm_space(" \n\t "), "");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Lakers <b>rally</b> late</p><p>in LA</p>"),
            "Lakers rally late in LA"
        );
        assert_eq!(strip_html("plain text"), "plain text");
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = fingerprint("warriors win big|espn.com");
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint("warriors win big|espn.com"));
        assert_ne!(a, fingerprint("warriors win big|cbssports.com"));
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("https://www.espn.com/nba/story"), "espn.com");
        assert_eq!(registrable_domain("https://sports.yahoo.com/nba/rss.xml"), "yahoo.com");
        assert_eq!(registrable_domain("https://news.google.com/articles/x"), "google.com");
        assert_eq!(registrable_domain("https://www.bbc.co.uk/sport"), "bbc.co.uk");
        assert_eq!(registrable_domain("https://example.com"), "example.com");
        assert_eq!(registrable_domain("http://127.0.0.1:8080/a"), "127.0.0.1");
        assert_eq!(registrable_domain("not a url"), "");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://News.Google.com/x").as_deref(), Some("news.google.com"));
        assert_eq!(host_of("/r/nba"), None);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("site").join("content");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
