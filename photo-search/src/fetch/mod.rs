//! Feed transport
//!
//! [`FeedFetcher`] is the capability the search client uses to perform the
//! remote query. [`HttpFeedFetcher`] is the reqwest-backed implementation;
//! tests substitute their own.

pub mod jsonp;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::HttpConfig;

/// Trait for feed transports
///
/// Every failure (network error, timeout, non-success status, undecodable
/// body) is reported as a single error.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch `url` and return the decoded raw payload
    async fn fetch(&self, url: &str) -> Result<Value>;
}

/// HTTP feed transport
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    /// Create a fetcher with the configured timeout and user agent
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::with_client(client))
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            return Err(anyhow!("feed error {}: {}", status, snippet));
        }

        let body = response.text().await?;
        tracing::debug!(bytes = body.len(), "received feed body");

        let json = jsonp::unescape_single_quotes(jsonp::unwrap(&body));
        let value: Value = serde_json::from_str(&json).context("feed body is not valid JSON")?;
        Ok(value)
    }
}
