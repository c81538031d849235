//! Text helpers shared by the scrapers, the validator and logging.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme regex"));

/// Whether `s` begins with a URL scheme such as `https://`.
pub fn starts_with_scheme(s: &str) -> bool {
    URL_SCHEME.is_match(s)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text under an element, whitespace-normalized.
///
/// Text nodes are joined with spaces so that `<h3>Title</h3><p>Body</p>`
/// reads as `Title Body` rather than `TitleBody`.
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("ééé", 1);
        assert_eq!(result, "é…(+4 bytes)");
    }

    #[test]
    fn test_starts_with_scheme() {
        assert!(starts_with_scheme("https://claude.com/blog/a"));
        assert!(starts_with_scheme("http://example.com"));
        assert!(!starts_with_scheme("/blog/a"));
        assert!(!starts_with_scheme("Claude: a new chapter"));
        assert!(!starts_with_scheme("httpx tips and tricks"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Building\n   agents\twith Claude "), "Building agents with Claude");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_element_text_joins_nodes() {
        let html = Html::parse_fragment("<a href=\"/blog/x\"><h3>Agent SDK</h3><span>Deep dive</span></a>");
        let selector = Selector::parse("a").unwrap();
        let anchor = html.select(&selector).next().unwrap();
        assert_eq!(element_text(&anchor), "Agent SDK Deep dive");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }
}
