//! Feed configuration.
//!
//! Every value has a default matching the Claude blog, so the binary runs
//! without a config file. A YAML file can override any subset of fields:
//!
//! ```yaml
//! site:
//!   origin: https://claude.com
//!   listing_url: https://claude.com/blog
//! http:
//!   timeout_secs: 20
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub site: SiteConfig,
    pub channel: ChannelConfig,
    pub http: HttpConfig,
    /// How many article pages may be enriched at once.
    pub concurrency: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            channel: ChannelConfig::default(),
            http: HttpConfig::default(),
            concurrency: 4,
        }
    }
}

/// Where the listing lives and how article links are recognized.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefixed to root-relative links.
    pub origin: String,
    pub listing_url: String,
    /// Path segment every article link contains.
    pub blog_path: String,
    /// Links containing this segment are category indexes, not articles.
    pub category_path: String,
    /// Category label attached to every item.
    pub category: String,
    /// Anchor texts that belong to navigation rather than articles.
    pub navigation_labels: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://claude.com".to_string(),
            listing_url: "https://claude.com/blog".to_string(),
            blog_path: "/blog/".to_string(),
            category_path: "/category/".to_string(),
            category: "Blog".to_string(),
            navigation_labels: ["Blog", "Home", "Read more", "Learn more"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Channel-level metadata written at the top of the feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub author: String,
    pub logo: String,
    pub subtitle: String,
    /// Base of the self link; the feed file name is appended to it.
    pub self_link_base: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "Claude Blog".to_string(),
            description: "Latest posts from the Claude Blog".to_string(),
            link: "https://claude.com/blog".to_string(),
            language: "en".to_string(),
            author: "Claude".to_string(),
            logo: "https://cdn.prod.website-files.com/6889473510b50328dbb70ae6/68c33859cc6cd903686c66a2_apple-touch-icon.png".to_string(),
            subtitle: "Get practical guidance and best practices for building with Claude".to_string(),
            self_link_base: "https://claude.com/blog".to_string(),
        }
    }
}

impl ChannelConfig {
    pub fn self_link(&self, feed_name: &str) -> String {
        format!(
            "{}/{}",
            self.self_link_base.trim_end_matches('/'),
            feed_file_name(feed_name)
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FeedConfig {
    /// Read a YAML config file. Missing fields keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: FeedConfig = serde_yaml::from_str(&raw)?;
        info!(listing_url = %config.site.listing_url, "Loaded feed configuration");
        Ok(config)
    }

    /// Enrichment concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// File name the sink writes a feed to.
pub fn feed_file_name(feed_name: &str) -> String {
    format!("feed_{feed_name}.xml")
}
