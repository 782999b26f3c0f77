//! Plain HTTP fetching for the course page.
//!
//! Provides the [`PageFetcher`] seam the scheduler drives, plus the
//! concrete [`HttpFetcher`] built on `reqwest` with a browser-like
//! User-Agent and a fixed timeout. Failures are signalled as an empty
//! result after logging; nothing here ever propagates an error into the
//! polling loop.

use crate::config::MonitorConfig;
use crate::errors::MonitorError;
use async_trait::async_trait;
use log::{debug, error};

/// Retrieves raw content for a plain (unauthenticated) target.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the body at `url`, or `None` on any network, timeout or
    /// non-2xx failure. The failure is logged by the implementation.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client with the configured User-Agent and timeout.
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| MonitorError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("failed to fetch {url}: {e}");
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                error!("fetch of {url} returned an error status: {e}");
                return None;
            }
        };

        match response.text().await {
            Ok(body) => {
                debug!("fetched {} bytes from {url}", body.len());
                Some(body)
            }
            Err(e) => {
                error!("failed to read body from {url}: {e}");
                None
            }
        }
    }
}
