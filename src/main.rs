//! # Claude Blog Feed
//!
//! Scrapes the Claude blog listing page, visits each linked article to find
//! its publish date and summary, and writes the result as an RSS 2.0 feed.
//!
//! ## Usage
//!
//! ```sh
//! claude_blog_feed --feed-name claude_blog --output-dir ./feeds
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: discover article links and titles on the listing page
//! 2. **Enrichment**: fetch each article page for its date and description
//! 3. **Validation**: drop records that fail basic quality checks
//! 4. **Output**: sort newest first, render RSS and write `feed_<name>.xml`

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod errors;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;
mod validate;

use cli::Cli;
use config::FeedConfig;
use fetcher::HttpFetcher;
use outputs::sink::DirectorySink;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => FeedConfig::load(path)?,
        None => FeedConfig::default(),
    };
    let config = args.apply(config);

    let fetcher = match HttpFetcher::new(&config.http) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return Err(e.into());
        }
    };
    let sink = DirectorySink::new(&args.output_dir);

    info!(feed_name = %args.feed_name, listing_url = %config.site.listing_url, "Generating feed");
    if pipeline::run(&config, &fetcher, &sink, Some(&args.feed_name)).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
