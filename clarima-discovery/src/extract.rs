//! Page content extraction
//!
//! Best-effort plain-text extraction used to enrich the document corpus.
//! Failures are reported as `None` and never abort discovery or scoring.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Maximum characters kept from one extracted page
const MAX_EXTRACT_CHARS: usize = 50_000;

/// Minimum useful extraction; shorter pages are treated as failures
const MIN_EXTRACT_CHARS: usize = 500;

/// HTML/PDF content extraction capability
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch and extract plain text for a URL, or `None` on any failure.
    async fn extract(&self, url: &str) -> Option<String>;
}

/// Jina AI Reader front end: prefixing any URL with r.jina.ai returns its
/// extracted text content.
pub struct JinaReaderClient {
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct JinaResponse {
    #[serde(default)]
    data: JinaData,
}

#[derive(Debug, Default, Deserialize)]
struct JinaData {
    #[serde(default)]
    content: String,
}

impl JinaReaderClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { http }
    }
}

impl Default for JinaReaderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for JinaReaderClient {
    async fn extract(&self, url: &str) -> Option<String> {
        let jina_url = format!("https://r.jina.ai/{}", url);

        let response = match self
            .http
            .get(&jina_url)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url, error = %e, "Content extraction request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "Content extraction rejected");
            return None;
        }

        let body: JinaResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                debug!(url, error = %e, "Content extraction returned malformed body");
                return None;
            }
        };

        let content = body.data.content;
        if content.len() < MIN_EXTRACT_CHARS {
            return None;
        }

        debug!(url, chars = content.len(), "Extracted page content");
        Some(content.chars().take(MAX_EXTRACT_CHARS).collect())
    }
}
