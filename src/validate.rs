//! Minimum-quality checks applied to every record before it reaches the feed.

use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Titles shorter than this are almost certainly scraping noise.
pub const MIN_TITLE_CHARS: usize = 5;

static ACCEPTED_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://|/)").expect("valid link regex"));

/// Check a record and log why it was rejected.
///
/// The publish date needs no check here: `published_at` is always set, to the
/// resolution time when nothing better was found.
pub fn validate(record: &ArticleRecord) -> bool {
    if record.title.trim().chars().count() < MIN_TITLE_CHARS {
        warn!(link = %record.link, "Invalid title for article");
        return false;
    }

    if !ACCEPTED_LINK.is_match(&record.link) {
        let title = if record.title.is_empty() { "unknown" } else { record.title.as_str() };
        warn!(%title, link = %record.link, "Invalid link for article");
        return false;
    }

    true
}
