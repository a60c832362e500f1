//! Clarima Discovery - adaptive exhaustive document discovery
//!
//! Finds a bounded, deduplicated set of relevant public documents about a
//! company through an iterative search loop with dynamic query generation,
//! relevance filtering, and a data-driven termination rule.

pub mod controller;
pub mod extract;
pub mod name_variations;
pub mod queries;
pub mod relevance;
pub mod search;
pub mod types;

pub use controller::AdaptiveSearchController;
pub use extract::{ContentExtractor, JinaReaderClient};
pub use queries::{infer_company_domain, QueryTemplateGenerator, TEMPLATE_SET_SIZE};
pub use search::{BraveSearchClient, SearchHit, SearchProvider};
pub use types::{normalize_url, DiscoveryError, DiscoveryResult, DiscoverySession, Document};
