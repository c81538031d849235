//! One feed generation run: fetch the listing, parse it, assemble the feed and
//! hand it to the sink.
//!
//! Nothing is written unless every stage succeeds and at least one article
//! was found.

use crate::config::FeedConfig;
use crate::errors::RunError;
use crate::fetcher::PageFetcher;
use crate::outputs::rss::assemble_feed;
use crate::outputs::sink::FeedSink;
use crate::scrapers::listing::ListingParser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_FEED_NAME: &str = "claude_blog";

/// How a run that did not crash ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Published { path: PathBuf, articles: usize },
    /// The listing yielded no articles; its structure has likely changed.
    NoArticles,
}

/// Generate and store the feed.
///
/// Returns `true` only when a feed was written. Every failure is logged and
/// reported as `false`.
#[instrument(level = "info", skip(config, fetcher, sink))]
pub async fn run<F, S>(config: &FeedConfig, fetcher: &F, sink: &S, feed_name: Option<&str>) -> bool
where
    F: PageFetcher,
    S: FeedSink,
{
    let feed_name = feed_name.unwrap_or(DEFAULT_FEED_NAME);
    let start_time = Instant::now();

    match generate(config, fetcher, sink, feed_name).await {
        Ok(RunOutcome::Published { path, articles }) => {
            let elapsed = start_time.elapsed();
            info!(
                path = %path.display(),
                articles,
                secs = elapsed.as_secs(),
                millis = elapsed.subsec_millis(),
                "Successfully generated RSS feed"
            );
            true
        }
        Ok(RunOutcome::NoArticles) => {
            warn!("No articles found! The blog structure may have changed.");
            false
        }
        Err(e) => {
            error!(error = %e, "Failed to generate RSS feed");
            false
        }
    }
}

/// The fallible part of [`run`].
pub async fn generate<F, S>(
    config: &FeedConfig,
    fetcher: &F,
    sink: &S,
    feed_name: &str,
) -> Result<RunOutcome, RunError>
where
    F: PageFetcher,
    S: FeedSink,
{
    let parser = ListingParser::new(&config.site, config.concurrency())?;

    let listing = fetcher.fetch(&config.site.listing_url).await.inspect_err(|e| {
        error!(url = %config.site.listing_url, error = %e, "Error fetching blog content");
    })?;

    let outcome = parser.parse(fetcher, &listing).await;
    if outcome.records.is_empty() {
        return Ok(RunOutcome::NoArticles);
    }

    let document = assemble_feed(&outcome.records, feed_name, &config.channel)?;
    let path = sink.save(&document, feed_name).await?;

    Ok(RunOutcome::Published {
        path,
        articles: document.items.len(),
    })
}
