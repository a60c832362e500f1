//! Core data type definitions

use serde::{Deserialize, Serialize};

/// Company identity and descriptive metadata used throughout an assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Legal or trading name, as submitted
    pub name: String,
    /// ISIN or other unique identifier, when known
    pub isin: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

impl CompanyProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isin: None,
            sector: None,
            industry: None,
            country: None,
        }
    }

    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }
}

/// Lifecycle of one assessment job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarimaConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub discovery: DiscoveryConfig,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: crate::LoggingConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type (deepseek, openai, anthropic)
    pub provider: String,
    /// Model name
    pub model: String,
    /// API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Base URL for OpenAI-compatible providers
    pub base_url: Option<String>,
    /// Temperature for generation; 0 for repeatable scoring
    pub temperature: f32,
    /// Maximum tokens to generate per batch call
    pub max_tokens: u32,
}

/// Web search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key (optional, can be set via BRAVE_API_KEY)
    pub api_key: Option<String>,
    /// Search API endpoint
    pub endpoint: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

/// Adaptive document discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Hard cap on search iterations
    pub max_iterations: u32,
    /// Hard cap on unique documents collected
    pub max_documents: usize,
    /// Results requested per individual query
    pub results_per_query: usize,
    /// Courtesy delay between outbound search calls
    pub query_delay_ms: u64,
    /// Whether to fetch page text for top documents to enrich the corpus
    pub extract_content: bool,
    /// How many top documents to run content extraction on
    pub extract_top_n: usize,
}

/// Batched scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Character budget for the formatted document corpus in each prompt
    pub corpus_char_budget: usize,
    /// Character budget for the methodology text in each prompt
    pub methodology_char_budget: usize,
    /// Bounded fan-out for concurrent batch scoring
    pub max_concurrent_batches: usize,
    /// Whether to run the second-pass retry over weak measures
    pub enable_retry_pass: bool,
}
