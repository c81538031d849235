//! Page retrieval.
//!
//! The pipeline only needs "give me the markup behind this URL", so fetching
//! sits behind the [`PageFetcher`] trait. [`HttpFetcher`] is the real
//! implementation; tests drive the pipeline with an in-memory fetcher.

use crate::config::HttpConfig;
use crate::errors::FetchError;
use reqwest::Client;
use tracing::{debug, instrument};

/// Retrieve the raw markup for a URL.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
///
/// The client carries a browser user agent, since the blog rejects obvious
/// bots, and a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages by URL and records every request.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(url.to_string()))
        }
    }
}
