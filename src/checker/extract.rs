// src/checker/extract.rs
// =============================================================================
// Pulls candidate URLs out of free text (video descriptions, comments).
//
// Descriptions are plain text, not Markdown or HTML, so this is a lexical scan:
// anything that starts with http:// or https:// and runs until whitespace.
// People write "see https://example.com." or "(https://example.com)" all the
// time, so trailing punctuation is trimmed before the URL is kept.
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL regex is valid"));

/// Characters that close a sentence or a bracket rather than a URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '\'', '>'];

// Extracts all absolute HTTP/HTTPS URLs from a block of text
//
// Returns them deduplicated, in the order they first appear.
//
// Example:
//   "Shop: https://shop.example.com/, docs (https://docs.example.com)."
//   -> ["https://shop.example.com/", "https://docs.example.com"]
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for found in URL_REGEX.find_iter(text) {
        let candidate = normalize_url(found.as_str());

        // "https://" on its own, or "http://." after trimming, is not a link
        if Url::parse(&candidate).map_or(true, |u| u.host_str().is_none()) {
            continue;
        }

        if seen.insert(candidate.clone()) {
            urls.push(candidate);
        }
    }

    urls
}

/// Normalized form used as the cache key: surrounding whitespace and
/// trailing punctuation removed.
pub fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches(TRAILING_PUNCTUATION).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_sentence() {
        let urls = extract_urls("Check https://example.com/offer?ref=123 now");
        assert_eq!(urls, vec!["https://example.com/offer?ref=123"]);
    }

    #[test]
    fn test_trailing_punctuation_is_trimmed() {
        let text = "Shop: https://shop.example.com/, docs (https://docs.example.com). \"https://q.example.com\"";
        let urls = extract_urls(text);
        assert_eq!(
            urls,
            vec![
                "https://shop.example.com/",
                "https://docs.example.com",
                "https://q.example.com",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "https://a.example.com/x https://a.example.com/x. https://a.example.com/x,";
        assert_eq!(extract_urls(text), vec!["https://a.example.com/x"]);
    }

    #[test]
    fn test_ignores_non_http_and_bare_schemes() {
        let text = "mail me: mailto:me@example.com or ftp://files.example.com or https:// alone";
        assert!(extract_urls(text).is_empty());
    }

    #[test]
    fn test_multiline_text() {
        let text = "Links:\nhttps://one.example.com\n\thttp://two.example.com/page\n";
        assert_eq!(extract_urls(text).len(), 2);
    }
}
