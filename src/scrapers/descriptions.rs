//! Article summary resolution.

use super::absolutize;
use crate::errors::FetchError;
use crate::fetcher::PageFetcher;
use crate::models::Resolved;
use crate::utils::{element_text, truncate_chars};
use scraper::{Html, Selector};
use tracing::{instrument, warn};
use url::Url;

/// A paragraph must be longer than this to count as a summary.
pub const MIN_PARAGRAPH_CHARS: usize = 50;
/// Paragraph summaries are cut to this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStrategy {
    /// `content` of the first matching meta tag.
    Meta(&'static str),
    /// First paragraph with enough text to stand on its own.
    FirstParagraph,
}

pub const DESCRIPTION_STRATEGIES: &[DescriptionStrategy] = &[
    DescriptionStrategy::Meta(r#"meta[name="description"]"#),
    DescriptionStrategy::Meta(r#"meta[property="og:description"]"#),
    DescriptionStrategy::FirstParagraph,
];

impl DescriptionStrategy {
    pub fn extract(&self, document: &Html) -> Option<String> {
        match self {
            DescriptionStrategy::Meta(css) => {
                let selector = Selector::parse(css).ok()?;
                document
                    .select(&selector)
                    .next()?
                    .value()
                    .attr("content")
                    .map(str::trim)
                    .filter(|content| !content.is_empty())
                    .map(str::to_string)
            }
            DescriptionStrategy::FirstParagraph => {
                let selector = Selector::parse("p").ok()?;
                document
                    .select(&selector)
                    .map(|p| element_text(&p))
                    .find(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
                    .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
            }
        }
    }
}

/// Extract a summary from a parsed article page.
pub fn extract_description(document: &Html) -> Option<String> {
    DESCRIPTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.extract(document))
}

/// Fetch an article page and resolve its summary.
///
/// Resolves to an empty string, flagged as a fallback, when the page cannot be
/// fetched or has nothing suitable. Callers substitute the title.
// Listing enrichment uses `resolve_metadata`, which shares one fetch.
#[allow(dead_code)]
#[instrument(level = "debug", skip(fetcher, origin))]
pub async fn resolve_description<F: PageFetcher>(
    fetcher: &F,
    origin: &Url,
    article_url: &str,
) -> Resolved<String> {
    let url = absolutize(origin, article_url);

    let body = match fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => return unreachable_description(&url, &e),
    };

    description_or_empty(&Html::parse_document(&body))
}

/// [`extract_description`] on an already fetched page, falling back to empty.
pub fn description_or_empty(document: &Html) -> Resolved<String> {
    match extract_description(document) {
        Some(description) => Resolved::found(description),
        None => Resolved::fallback(String::new()),
    }
}

pub(crate) fn unreachable_description(url: &str, error: &FetchError) -> Resolved<String> {
    warn!(%url, %error, "Error fetching article description");
    Resolved::fallback(String::new())
}
