//! Photo search client
//!
//! Issues the feed query for a keyword through a [`FeedFetcher`] and
//! normalizes the payload with [`parser::parse`]. Every failure comes back
//! as one [`SearchError`], so callers handle a single failure branch.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{SearchError, SearchOutcome};
use crate::fetch::{FeedFetcher, HttpFeedFetcher};
use crate::parser;
use crate::query::QueryTemplate;
use crate::types::PhotoResult;

/// Trait for keyword photo searches
///
/// The coordinator depends on this rather than on [`PhotoSearchClient`]
/// directly, so it can be driven by a stub in tests.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Find all photos tagged with `keyword`, in feed order
    async fn find_all_by_keyword(&self, keyword: &str) -> SearchOutcome<Vec<PhotoResult>>;
}

/// Feed-backed [`PhotoSearch`] implementation
#[derive(Clone)]
pub struct PhotoSearchClient {
    fetcher: Arc<dyn FeedFetcher>,
    template: QueryTemplate,
}

impl PhotoSearchClient {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, template: QueryTemplate) -> Self {
        Self { fetcher, template }
    }

    /// Build a client with the HTTP transport and the configured template
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let template = QueryTemplate::from_config(&config.feed)?;
        let fetcher = HttpFeedFetcher::new(&config.http)?;
        Ok(Self::new(Arc::new(fetcher), template))
    }

    pub fn template(&self) -> &QueryTemplate {
        &self.template
    }
}

#[async_trait]
impl PhotoSearch for PhotoSearchClient {
    async fn find_all_by_keyword(&self, keyword: &str) -> SearchOutcome<Vec<PhotoResult>> {
        let url = self.template.url_for(keyword);
        tracing::info!("Searching photo feed for: {}", keyword);
        tracing::debug!(%url, "issuing feed query");

        let raw = self.fetcher.fetch(&url).await.map_err(|e| {
            tracing::warn!("Feed request failed: {:#}", e);
            SearchError::Transport(format!("{:#}", e))
        })?;

        let results = parser::parse(&raw).map_err(|e| {
            tracing::warn!("Feed payload rejected: {}", e);
            SearchError::from(e)
        })?;

        tracing::info!("Found {} photos for: {}", results.len(), keyword);
        Ok(results)
    }
}
