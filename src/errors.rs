//! Error types for each stage of the feed pipeline.
//!
//! Only listing-level failures, feed assembly and persistence are allowed to
//! reach the top of a run. Per-article enrichment failures are absorbed by the
//! resolvers and never surface as one of these errors.

use std::path::PathBuf;
use thiserror::Error;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no page available for {0}")]
    NotFound(String),
}

/// The listing markup could not be processed at all.
///
/// Individual candidates that fail to yield a title or a date are not errors;
/// they are counted and reported in the parse summary.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid site origin `{origin}`: {source}")]
    Origin {
        origin: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("failed to write feed XML: {0}")]
    Xml(#[from] std::io::Error),

    #[error("feed XML is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not create feed directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write feed file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure that ends a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
