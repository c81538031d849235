//! Publish date resolution.
//!
//! An article page is searched with [`DATE_STRATEGIES`] in order. The first
//! strategy that produces a non-empty string wins, and that string is parsed
//! with [`DATE_FORMATS`] in order. Anything short of a parsed date falls back
//! to the current time, so one undated article never sinks the feed.

use super::absolutize;
use crate::errors::FetchError;
use crate::fetcher::PageFetcher;
use crate::models::Resolved;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Where a publish date may be found on an article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// First element matching the selector; its `datetime` attribute, then
    /// `content`, then its text.
    Element(&'static str),
    /// `datePublished` of a JSON-LD block.
    JsonLd,
}

pub const DATE_STRATEGIES: &[DateStrategy] = &[
    DateStrategy::Element("time[datetime]"),
    DateStrategy::Element(r#"meta[property="article:published_time"]"#),
    DateStrategy::Element(r#"meta[name="publication_date"]"#),
    DateStrategy::Element(r#"span[class*="date"]"#),
    DateStrategy::Element(r#"p[class*="date"]"#),
    DateStrategy::JsonLd,
];

/// Accepted timestamp layouts. Layouts without a time of day resolve to
/// midnight; layouts without an offset are taken as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    DateTime(&'static str),
    Date(&'static str),
    Rfc3339,
}

pub const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%S%.fZ"),
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%SZ"),
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%S"),
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::Date("%b %d, %Y"),
    DateFormat::Date("%B %d, %Y"),
    DateFormat::Rfc3339,
];

impl DateStrategy {
    /// The raw date string this strategy finds in `document`, if any.
    pub fn candidate(&self, document: &Html) -> Option<String> {
        match self {
            DateStrategy::Element(css) => {
                let selector = Selector::parse(css).ok()?;
                document.select(&selector).next().and_then(element_candidate)
            }
            DateStrategy::JsonLd => json_ld_date(document),
        }
    }
}

impl DateFormat {
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|naive| naive.and_utc()),
            DateFormat::Date(fmt) => NaiveDate::parse_from_str(raw, fmt)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

fn element_candidate(element: ElementRef<'_>) -> Option<String> {
    let value = element.value();
    value
        .attr("datetime")
        .or_else(|| value.attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| Some(crate::utils::element_text(&element)))
        .filter(|s| !s.is_empty())
}

fn json_ld_date(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        let json: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
        date_published(&json)
    })
}

fn date_published(json: &serde_json::Value) -> Option<String> {
    match json {
        serde_json::Value::Array(items) => items.iter().find_map(date_published),
        serde_json::Value::Object(obj) => obj
            .get("datePublished")
            .and_then(|d| d.as_str())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .or_else(|| obj.get("@graph").and_then(date_published)),
        _ => None,
    }
}

/// Parse a raw date string with the first matching [`DATE_FORMATS`] entry.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DATE_FORMATS.iter().find_map(|format| format.parse(raw))
}

/// Extract the publish date from a parsed article page.
///
/// Only the first strategy that yields a string is considered; if that string
/// does not parse, there is no date.
pub fn extract_date(document: &Html) -> Option<DateTime<Utc>> {
    let raw = DATE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.candidate(document))?;
    debug!(%raw, "Date candidate");
    parse_date(&raw)
}

/// Fetch an article page and resolve its publish date.
///
/// Falls back to the current UTC time when the page cannot be fetched or has
/// no recognizable date.
// Listing enrichment uses `resolve_metadata`, which shares one fetch.
#[allow(dead_code)]
#[instrument(level = "debug", skip(fetcher, origin))]
pub async fn resolve_date<F: PageFetcher>(
    fetcher: &F,
    origin: &Url,
    article_url: &str,
) -> Resolved<DateTime<Utc>> {
    let url = absolutize(origin, article_url);

    let body = match fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => return unreachable_date(&url, &e),
    };

    date_or_now(&Html::parse_document(&body), &url)
}

/// [`extract_date`] on an already fetched page, falling back to now.
pub fn date_or_now(document: &Html, url: &str) -> Resolved<DateTime<Utc>> {
    match extract_date(document) {
        Some(date) => Resolved::found(date),
        None => {
            warn!(%url, "Could not extract date for article; using current time");
            Resolved::fallback(Utc::now())
        }
    }
}

/// Fallback used when the article page could not be fetched at all.
pub(crate) fn unreachable_date(url: &str, error: &FetchError) -> Resolved<DateTime<Utc>> {
    warn!(%url, %error, "Error fetching article page; using current time");
    Resolved::fallback(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StaticFetcher;
    use chrono::TimeZone;

    fn origin() -> Url {
        Url::parse("https://claude.com").unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2025-03-04T05:06:07.250Z").map(|d| d.timestamp_millis()),
            Some(utc(2025, 3, 4, 5, 6, 7).timestamp_millis() + 250)
        );
        assert_eq!(parse_date("2025-03-04T05:06:07Z"), Some(utc(2025, 3, 4, 5, 6, 7)));
        assert_eq!(parse_date("2025-03-04T05:06:07"), Some(utc(2025, 3, 4, 5, 6, 7)));
        assert_eq!(parse_date("2025-03-04"), Some(utc(2025, 3, 4, 0, 0, 0)));
        assert_eq!(parse_date("Mar 4, 2025"), Some(utc(2025, 3, 4, 0, 0, 0)));
        assert_eq!(parse_date("September 30, 2025"), Some(utc(2025, 9, 30, 0, 0, 0)));
        assert_eq!(parse_date("2025-03-04T07:06:07+02:00"), Some(utc(2025, 3, 4, 5, 6, 7)));
    }

    #[test]
    fn test_parse_date_rejects_unknown_layouts() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("04/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_time_element_wins_over_meta() {
        let html = Html::parse_document(
            r#"<html><head><meta property="article:published_time" content="2024-01-01T00:00:00Z"></head>
            <body><time datetime="2025-06-15">June 15, 2025</time></body></html>"#,
        );
        assert_eq!(extract_date(&html), Some(utc(2025, 6, 15, 0, 0, 0)));
    }

    #[test]
    fn test_meta_content_is_used() {
        let html = Html::parse_document(
            r#"<html><head><meta name="publication_date" content="2025-02-10T12:00:00Z"></head><body></body></html>"#,
        );
        assert_eq!(extract_date(&html), Some(utc(2025, 2, 10, 12, 0, 0)));
    }

    #[test]
    fn test_span_text_is_used() {
        let html = Html::parse_document(
            r#"<html><body><span class="post-date">  Oct 2, 2025 </span></body></html>"#,
        );
        assert_eq!(extract_date(&html), Some(utc(2025, 10, 2, 0, 0, 0)));
    }

    #[test]
    fn test_json_ld_date_published() {
        let html = Html::parse_document(
            r#"<html><head><script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[{"@type":"BlogPosting","datePublished":"2025-07-01T09:30:00Z"}]}
            </script></head><body></body></html>"#,
        );
        assert_eq!(extract_date(&html), Some(utc(2025, 7, 1, 9, 30, 0)));
    }

    #[test]
    fn test_first_candidate_is_final_even_if_unparseable() {
        let html = Html::parse_document(
            r#"<html><body><span class="date">a while ago</span><p class="date">2025-01-01</p></body></html>"#,
        );
        assert_eq!(extract_date(&html), None);
    }

    #[tokio::test]
    async fn test_resolve_date_found() {
        let fetcher = StaticFetcher::new().with_page(
            "https://claude.com/blog/agents",
            r#"<html><body><time datetime="2025-05-06T14:30:00Z"></time></body></html>"#,
        );

        let resolved = resolve_date(&fetcher, &origin(), "/blog/agents").await;
        assert!(!resolved.is_fallback());
        assert_eq!(resolved.value, utc(2025, 5, 6, 14, 30, 0));
        assert_eq!(fetcher.requests(), vec!["https://claude.com/blog/agents".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_date_falls_back_to_now_on_fetch_failure() {
        let fetcher = StaticFetcher::new();

        let before = Utc::now();
        let resolved = resolve_date(&fetcher, &origin(), "https://claude.com/blog/gone").await;
        let after = Utc::now();

        assert!(resolved.is_fallback());
        assert!(resolved.value >= before && resolved.value <= after);
    }

    #[tokio::test]
    async fn test_resolve_date_falls_back_when_page_has_no_date() {
        let fetcher = StaticFetcher::new()
            .with_page("https://claude.com/blog/undated", "<html><body><p>No date here</p></body></html>");

        let resolved = resolve_date(&fetcher, &origin(), "/blog/undated").await;
        assert!(resolved.is_fallback());
    }
}
