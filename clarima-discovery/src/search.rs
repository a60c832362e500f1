//! Web search capability
//!
//! Defines the `SearchProvider` seam the discovery controller depends on,
//! plus the Brave Web Search implementation used in production.

use crate::types::{DiscoveryError, DiscoveryResult};
use async_trait::async_trait;
use clarima_core::SearchConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One raw search hit, before relevance filtering
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Outbound web search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute one query, returning at most `max_results` hits.
    /// Timeouts, rate limits and malformed responses surface as errors;
    /// the caller decides whether they abort anything.
    async fn search(&self, query: &str, max_results: usize) -> DiscoveryResult<Vec<SearchHit>>;
}

/// Brave Web Search API client
pub struct BraveSearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveWebItem>,
}

#[derive(Debug, Deserialize)]
struct BraveWebItem {
    url: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl BraveSearchClient {
    /// Build a client from configuration, falling back to the BRAVE_API_KEY
    /// environment variable.
    pub fn new(config: &SearchConfig) -> DiscoveryResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("BRAVE_API_KEY").ok())
            .ok_or_else(|| {
                DiscoveryError::Config("Brave Search API key not found".to_string())
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl SearchProvider for BraveSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> DiscoveryResult<Vec<SearchHit>> {
        debug!(query, max_results, "Executing Brave search");

        let response = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("Accept-Encoding", "gzip")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[
                ("q", query),
                ("count", &max_results.to_string()),
                ("search_lang", "en"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: BraveResponse = response.json().await?;

        let mut hits = Vec::new();
        if let Some(web) = body.web {
            for item in web.results {
                // Skip malformed results without a URL
                let Some(url) = item.url else { continue };
                hits.push(SearchHit {
                    url,
                    title: item.title,
                    snippet: item.description,
                });
            }
        }

        debug!(query, hits = hits.len(), "Brave search returned");
        Ok(hits)
    }
}
