//! Page fetching over HTTP.
//!
//! A single GET per call with browser-like headers; no retries. Extraction code
//! depends on the [`PageFetcher`] trait so it can run against canned pages.

use crate::error::{ScholarError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// User agent string for requests
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can turn a URL into page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url`, failing on transport errors or non-2xx status.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// HTTP client options
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// [`PageFetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from options.
    ///
    /// # Errors
    ///
    /// Returns `ScholarError::Config` if the proxy URL is invalid or the
    /// client cannot be constructed.
    pub fn new(options: &FetchOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout);

        if let Some(proxy_url) = options.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                ScholarError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ScholarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScholarError::HttpStatus {
                code: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
