//! Feed persistence.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── feed_claude_blog.xml
//! └── feed_<name>.xml
//! ```

use super::rss::FeedDocument;
use crate::config::feed_file_name;
use crate::errors::PersistenceError;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Destination for finished feeds.
pub trait FeedSink {
    /// Store `document` under `feed_name` and return where it ended up.
    async fn save(&self, document: &FeedDocument, feed_name: &str) -> Result<PathBuf, PersistenceError>;
}

/// Writes `feed_<name>.xml` files into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FeedSink for DirectorySink {
    #[instrument(level = "info", skip(self, document), fields(dir = %self.dir.display()))]
    async fn save(&self, document: &FeedDocument, feed_name: &str) -> Result<PathBuf, PersistenceError> {
        if let Err(source) = fs::create_dir_all(&self.dir).await {
            error!(error = %source, "Failed to create feed directory");
            return Err(PersistenceError::CreateDir {
                path: self.dir.clone(),
                source,
            });
        }

        let path = self.dir.join(feed_file_name(feed_name));
        fs::write(&path, document.xml.as_bytes())
            .await
            .map_err(|source| PersistenceError::Write {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            items = document.items.len(),
            self_link = %document.self_link,
            built_at = %document.built_at,
            "Successfully saved RSS feed"
        );
        Ok(path)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;
    use crate::outputs::rss::assemble_feed;

    #[tokio::test]
    async fn test_directory_sink_creates_dir_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("feeds");
        let sink = DirectorySink::new(&dir);
        let document = assemble_feed(&[], "claude_blog", &ChannelConfig::default()).unwrap();

        let path = sink.save(&document, "claude_blog").await.unwrap();

        assert_eq!(path, dir.join("feed_claude_blog.xml"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, document.xml);
    }

    #[tokio::test]
    async fn test_directory_sink_reports_unwritable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "file in the way").unwrap();
        let sink = DirectorySink::new(blocker.join("feeds"));
        let document = assemble_feed(&[], "claude_blog", &ChannelConfig::default()).unwrap();

        let result = sink.save(&document, "claude_blog").await;

        assert!(matches!(result, Err(PersistenceError::CreateDir { .. })));
    }
}
