//! Blog listing page parser.
//!
//! Discovery runs synchronously over the listing markup: every anchor whose
//! href contains the blog path is normalized, deduplicated through the
//! seen-set, filtered and given a title. Only then are the surviving
//! candidates enriched from their article pages, optionally a few at a time.
//! Enrichment results come back in discovery order and are validated one by
//! one.
//!
//! # URL Pattern
//!
//! Articles live at `https://claude.com/blog/<slug>`. The listing page itself
//! (`/blog`, `/blog/`) and category indexes (`/blog/category/<name>`) are
//! linked from the same page and are skipped.

use super::{absolutize, resolve_metadata};
use crate::config::SiteConfig;
use crate::errors::ParseError;
use crate::fetcher::PageFetcher;
use crate::models::ArticleRecord;
use crate::utils::{element_text, starts_with_scheme, truncate_for_log};
use crate::validate::validate;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Anchor text must be longer than this to be taken as a title.
pub const MIN_ANCHOR_TITLE_CHARS: usize = 10;

/// A discovered article link that has not been enriched or validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub link: String,
}

/// What discovery found on the listing page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub candidates: Vec<Candidate>,
    /// Anchors matching the blog path, before any filtering.
    pub anchors: usize,
    pub duplicates: usize,
    /// Links to the listing page itself or to category indexes.
    pub index_links: usize,
    pub navigation: usize,
    /// Anchors whose text could not serve as a title.
    pub unknown_structures: usize,
}

/// Result of parsing a listing page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListingOutcome {
    /// Accepted records in discovery order.
    pub records: Vec<ArticleRecord>,
    pub discovery: Discovery,
    /// Enriched records the validator turned down.
    pub rejected: usize,
}

impl ListingOutcome {
    /// Candidates that were dropped for structural reasons, as reported in the
    /// end-of-parse summary.
    pub fn unknown_or_invalid(&self) -> usize {
        self.discovery.unknown_structures + self.rejected
    }
}

/// Parser for one site's listing page.
#[derive(Debug)]
pub struct ListingParser<'a> {
    site: &'a SiteConfig,
    origin: Url,
    anchor_selector: Selector,
    concurrency: usize,
}

impl<'a> ListingParser<'a> {
    /// Prepare a parser for `site`.
    ///
    /// # Errors
    ///
    /// Fails when the configured origin is not a URL or the blog path cannot
    /// be turned into a selector.
    pub fn new(site: &'a SiteConfig, concurrency: usize) -> Result<Self, ParseError> {
        let origin = Url::parse(&site.origin).map_err(|source| ParseError::Origin {
            origin: site.origin.clone(),
            source,
        })?;

        let css = format!(r#"a[href*="{}"]"#, site.blog_path);
        let anchor_selector = Selector::parse(&css).map_err(|e| ParseError::Selector {
            reason: e.to_string(),
            selector: css.clone(),
        })?;

        Ok(Self {
            site,
            origin,
            anchor_selector,
            concurrency: concurrency.max(1),
        })
    }

    /// Find article candidates in the listing markup, in document order.
    #[instrument(level = "info", skip_all)]
    pub fn discover(&self, markup: &str) -> Discovery {
        let document = Html::parse_document(markup);
        let anchors: Vec<ElementRef<'_>> = document.select(&self.anchor_selector).collect();
        info!(count = anchors.len(), "Found potential blog article links");

        let mut discovery = Discovery {
            anchors: anchors.len(),
            ..Discovery::default()
        };
        let mut seen: HashSet<String> = HashSet::new();

        for anchor in anchors {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            if href.is_empty() {
                continue;
            }

            let link = absolutize(&self.origin, href);
            if seen.contains(&link) {
                discovery.duplicates += 1;
                continue;
            }
            if self.is_index_link(&link) {
                discovery.index_links += 1;
                continue;
            }
            seen.insert(link.clone());

            let Some(title) = extract_title(&anchor) else {
                debug!(%link, "Could not extract title for link");
                discovery.unknown_structures += 1;
                continue;
            };

            if self.is_navigation_label(&title) {
                debug!(%link, %title, "Skipping navigation link");
                discovery.navigation += 1;
                continue;
            }

            discovery.candidates.push(Candidate { title, link });
        }

        debug!(
            anchors = discovery.anchors,
            candidates = discovery.candidates.len(),
            duplicates = discovery.duplicates,
            index_links = discovery.index_links,
            navigation = discovery.navigation,
            "Discovery complete"
        );
        discovery
    }

    /// Parse the listing markup into validated article records.
    ///
    /// Article pages that cannot be fetched or lack metadata still produce a
    /// record; only validation failures drop a candidate.
    #[instrument(level = "info", skip_all)]
    pub async fn parse<F: PageFetcher>(&self, fetcher: &F, markup: &str) -> ListingOutcome {
        let discovery = self.discover(markup);

        let enriched: Vec<ArticleRecord> = stream::iter(discovery.candidates.iter().cloned())
            .map(|candidate| self.enrich(fetcher, candidate))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut outcome = ListingOutcome {
            discovery,
            ..ListingOutcome::default()
        };
        for record in enriched {
            if validate(&record) {
                outcome.records.push(record);
            } else {
                outcome.rejected += 1;
            }
        }

        if outcome.unknown_or_invalid() > 0 {
            warn!(
                count = outcome.unknown_or_invalid(),
                "Encountered links with unknown or invalid structures"
            );
        }
        info!(count = outcome.records.len(), "Successfully parsed valid articles");
        outcome
    }

    /// Resolve date and description for one candidate and build its record.
    async fn enrich<F: PageFetcher>(&self, fetcher: &F, candidate: Candidate) -> ArticleRecord {
        info!(title = %candidate.title, "Processing article");

        let metadata = resolve_metadata(fetcher, &self.origin, &candidate.link).await;
        let (date, description) = (metadata.published_at, metadata.description);
        debug!(
            link = %candidate.link,
            published_at = %date.value,
            date_fallback = date.is_fallback(),
            description_fallback = description.is_fallback(),
            description = %truncate_for_log(&description.value, 80),
            "Enriched article"
        );

        let description = if description.value.is_empty() {
            candidate.title.clone()
        } else {
            description.into_value()
        };

        ArticleRecord {
            title: candidate.title,
            link: candidate.link,
            published_at: date.into_value(),
            description,
            category: self.site.category.clone(),
        }
    }

    fn is_index_link(&self, link: &str) -> bool {
        let blog_root = self.site.blog_path.trim_end_matches('/');
        link.ends_with(blog_root)
            || link.ends_with(&self.site.blog_path)
            || link.contains(&self.site.category_path)
    }

    fn is_navigation_label(&self, title: &str) -> bool {
        self.site.navigation_labels.iter().any(|label| label == title)
    }
}

/// Title taken from an anchor's own text.
///
/// Card anchors wrap the article heading, while "Read more" style anchors and
/// bare URLs are too short or look like links.
pub fn extract_title(anchor: &ElementRef<'_>) -> Option<String> {
    let text = element_text(anchor);
    if text.chars().count() > MIN_ANCHOR_TITLE_CHARS && !starts_with_scheme(&text) {
        Some(text)
    } else {
        None
    }
}
