//! Parsing of user submissions into links, hashtags and note text.
//!
//! # Responsibility
//! - Find URLs in free text the way users paste them (`https://`, `www.`).
//! - Turn `#hashtag` words into normalized tag names.
//! - Produce display-friendly URL forms for titles and buttons.
//!
//! # Invariants
//! - Tag names are lowercase, never empty and never start with `#`.
//! - `Submission::urls` always carry an http(s) scheme.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use url::Url;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:https?://|www\.)[\w\-]+(?:\.[\w\-]+)+(?:[\w\-.,@?^=%&:/~+#]*[\w\-@?^=%&/~+#])?)",
    )
    .expect("valid url regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Parsed form of one text message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// URLs in order of appearance, scheme-normalized.
    pub urls: Vec<String>,
    /// Normalized, deduplicated, sorted tag names.
    pub tags: Vec<String>,
    /// Remaining text without hashtags and URLs, whitespace-collapsed.
    pub note: String,
}

impl Submission {
    pub fn parse(text: &str) -> Self {
        let urls = extract_urls(text)
            .into_iter()
            .map(|url| normalize_url(&url))
            .collect();
        let tags = extract_hashtags(text);

        let without_urls = URL_RE.replace_all(text, " ");
        let note = without_urls
            .split_whitespace()
            .filter(|word| !word.starts_with('#'))
            .collect::<Vec<_>>()
            .join(" ");

        Self { urls, tags, note }
    }
}

/// Returns URLs found in `text` in order of appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    URL_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Adds `https://` when `url` has no http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Short `host/path` form of a URL for titles and button labels.
///
/// Returns the input unchanged when it cannot be parsed.
pub fn prettify_url(url: &str) -> String {
    let candidate = if url.to_ascii_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return url.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return url.to_string();
    };

    let mut pretty = host.strip_prefix("www.").unwrap_or(host).to_string();
    if let Some(port) = parsed.port() {
        pretty.push_str(&format!(":{port}"));
    }
    let path = parsed.path();
    if !path.is_empty() && path != "/" {
        pretty.push_str(path);
    }
    pretty
}

/// Normalizes one hashtag or tag name.
///
/// Strips leading `#`, trailing punctuation and lowercases. Returns `None`
/// when nothing meaningful remains.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_start_matches('#')
        .trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'));
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Extracts normalized hashtags from whitespace-separated words.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let unique = text
        .split_whitespace()
        .filter(|word| word.starts_with('#'))
        .filter_map(normalize_tag)
        .collect::<BTreeSet<_>>();
    unique.into_iter().collect()
}

/// Renders tags in the `#a #b` form stored alongside items.
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a stored `#a #b` string back into normalized tag names.
pub fn parse_tag_list(value: &str) -> Vec<String> {
    let unique = WHITESPACE_RE
        .split(value)
        .filter_map(normalize_tag)
        .collect::<BTreeSet<_>>();
    unique.into_iter().collect()
}
