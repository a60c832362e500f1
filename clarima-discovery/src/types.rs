//! Type definitions for document discovery

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A public document found for a company. Identity is the normalized URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Original URL as returned by the search provider
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// The search query that first surfaced this document
    pub originating_query: String,
}

/// Normalize a URL for identity comparison: lowercase scheme and host,
/// drop the fragment. Falls back to a lowercased trim when the URL does
/// not parse.
pub fn normalize_url(raw: &str) -> String {
    match url::Url::parse(raw.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            // Url already lowercases scheme and host on parse
            parsed.to_string()
        }
        Err(_) => raw.trim().to_lowercase(),
    }
}

/// Mutable state of one discovery run for one company. Owned exclusively
/// by the controller; only the document list outlives it.
#[derive(Debug)]
pub struct DiscoverySession {
    pub company_name: String,
    pub identifier: Option<String>,
    pub name_variations: Vec<String>,
    /// normalized url -> document, insertion-ordered within BTreeMap key order
    pub documents: BTreeMap<String, Document>,
    pub iteration_count: u32,
    pub consecutive_empty_iterations: u32,
}

impl DiscoverySession {
    pub fn new(company_name: &str, identifier: Option<&str>, name_variations: Vec<String>) -> Self {
        Self {
            company_name: company_name.to_string(),
            identifier: identifier.map(|s| s.to_string()),
            name_variations,
            documents: BTreeMap::new(),
            iteration_count: 0,
            consecutive_empty_iterations: 0,
        }
    }
}

/// Error types for the discovery system
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Core error: {0}")]
    Core(Box<clarima_core::ClarimaError>),
}

impl From<clarima_core::ClarimaError> for DiscoveryError {
    fn from(err: clarima_core::ClarimaError) -> Self {
        DiscoveryError::Core(Box::new(err))
    }
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
