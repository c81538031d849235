//! Data models for scraped blog articles.
//!
//! - [`ArticleRecord`]: one article as it will appear in the feed
//! - [`Resolved`]: a metadata value together with how it was obtained

use chrono::{DateTime, Utc};

/// A blog article ready for validation and feed assembly.
///
/// Records are built once by the listing parser and never modified afterwards;
/// the feed assembler only reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The anchor text from the listing page.
    pub title: String,
    /// Absolute URL of the article page; unique within a run.
    pub link: String,
    /// Publication time, or the time of resolution when none was found.
    pub published_at: DateTime<Utc>,
    /// Summary text; equals `title` when the article page offered nothing.
    pub description: String,
    /// Fixed category label of the feed.
    pub category: String,
}

/// How a [`Resolved`] value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Extracted from the article page.
    Found,
    /// The page was unreachable or had nothing usable; a default was used.
    Fallback,
}

/// Result of a soft-failing metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ResolutionSource,
}

impl<T> Resolved<T> {
    pub fn found(value: T) -> Self {
        Self {
            value,
            source: ResolutionSource::Found,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: ResolutionSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
