//! Blog scrapers.
//!
//! Scraping follows the usual two phases:
//!
//! 1. **Indexing**: [`listing`] discovers article links and titles on the
//!    listing page.
//! 2. **Enrichment**: each article page is fetched once and both its publish
//!    date ([`dates`]) and summary ([`descriptions`]) are read from it
//!    ([`resolve_metadata`]).
//!
//! Both resolvers walk an ordered list of extraction strategies and keep the
//! first one that produces a value. Enrichment never fails: an unreachable or
//! unrecognizable page degrades to a default, flagged through
//! [`Resolved`](crate::models::Resolved).

pub mod dates;
pub mod descriptions;
pub mod listing;

use crate::fetcher::PageFetcher;
use crate::models::Resolved;
use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::instrument;
use url::Url;

/// Publish date and summary of one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub published_at: Resolved<DateTime<Utc>>,
    pub description: Resolved<String>,
}

/// Fetch an article page once and resolve both its date and its summary.
///
/// Falls back exactly like [`dates::resolve_date`] and
/// [`descriptions::resolve_description`] do.
#[instrument(level = "debug", skip(fetcher, origin))]
pub async fn resolve_metadata<F: PageFetcher>(
    fetcher: &F,
    origin: &Url,
    article_url: &str,
) -> ArticleMetadata {
    let url = absolutize(origin, article_url);

    match fetcher.fetch(&url).await {
        Ok(body) => {
            let document = Html::parse_document(&body);
            ArticleMetadata {
                published_at: dates::date_or_now(&document, &url),
                description: descriptions::description_or_empty(&document),
            }
        }
        Err(e) => ArticleMetadata {
            published_at: dates::unreachable_date(&url, &e),
            description: descriptions::unreachable_description(&url, &e),
        },
    }
}

/// Turn a root-relative href into an absolute link on `origin`.
///
/// Absolute and other hrefs are returned unchanged; the validator decides
/// whether they are acceptable.
pub fn absolutize(origin: &Url, href: &str) -> String {
    if href.starts_with('/') && !href.starts_with("//") {
        if let Ok(joined) = origin.join(href) {
            return joined.to_string();
        }
    }
    href.to_string()
}
