//! Command-line interface definitions.
//!
//! Every option can also be provided through an environment variable. Values
//! given here override the config file.

use crate::config::FeedConfig;
use crate::pipeline::DEFAULT_FEED_NAME;
use clap::Parser;

/// Generate an RSS feed from the Claude blog.
///
/// # Examples
///
/// ```sh
/// # Write feeds/feed_claude_blog.xml
/// claude_blog_feed
///
/// # Custom feed name and directory
/// claude_blog_feed --feed-name weekly --output-dir /var/www/feeds
///
/// # Target another blog with the same layout
/// claude_blog_feed --config blog.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Feed name; the output file is `feed_<name>.xml`
    #[arg(short = 'n', long, env = "FEED_NAME", default_value = DEFAULT_FEED_NAME)]
    pub feed_name: String,

    /// Directory the feed file is written to
    #[arg(short, long, env = "FEED_OUTPUT_DIR", default_value = "feeds")]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "FEED_CONFIG")]
    pub config: Option<String>,

    /// Number of article pages fetched at once
    #[arg(long, env = "FEED_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, env = "FEED_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: FeedConfig) -> FeedConfig {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.http.timeout_secs = timeout_secs;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["claude_blog_feed"]);

        assert_eq!(cli.feed_name, "claude_blog");
        assert_eq!(cli.output_dir, "feeds");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["claude_blog_feed", "-n", "weekly", "-o", "/tmp/feeds", "-c", "blog.yaml"]);

        assert_eq!(cli.feed_name, "weekly");
        assert_eq!(cli.output_dir, "/tmp/feeds");
        assert_eq!(cli.config.as_deref(), Some("blog.yaml"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["claude_blog_feed", "--concurrency", "1", "--timeout-secs", "30"]);

        let config = cli.apply(FeedConfig::default());
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_cli_without_overrides_keeps_config() {
        let cli = Cli::parse_from(["claude_blog_feed"]);

        let config = cli.apply(FeedConfig::default());
        assert_eq!(config.concurrency(), 4);
        assert_eq!(config.http.timeout_secs, 10);
    }
}
