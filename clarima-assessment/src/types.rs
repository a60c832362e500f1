//! Type definitions for the batched scoring pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence the model reports for one scored measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
    Unknown,
}

impl Confidence {
    /// Case-insensitive parse; anything unrecognized is `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Unknown,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
            Confidence::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// One measure's scored outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureResult {
    pub measure_id: String,
    /// Ordinal score on the 0-4 scale
    pub score: u8,
    pub confidence: Confidence,
    pub rationale: String,
    /// Verbatim quotes backing the score, in model order
    pub evidence: Vec<String>,
    /// URLs corresponding to the evidence quotes
    pub sources: Vec<String>,
    /// Which model produced this result
    pub model: String,
}

impl MeasureResult {
    /// Default result for a measure the model did not (usably) assess
    pub fn default_for(measure_id: &str, rationale: &str, model: &str) -> Self {
        Self {
            measure_id: measure_id.to_string(),
            score: 0,
            confidence: Confidence::Unknown,
            rationale: rationale.to_string(),
            evidence: vec!["No evidence found".to_string()],
            sources: Vec::new(),
            model: model.to_string(),
        }
    }
}

/// Overall qualitative rating derived from the average score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskRating::Low => "Low",
            RiskRating::Medium => "Medium",
            RiskRating::High => "High",
        };
        write!(f, "{}", s)
    }
}

/// The authoritative per-company assessment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub company_name: String,
    pub isin: Option<String>,
    pub overall_risk_rating: RiskRating,
    /// The 0-4 ordinal mean mapped onto a 0-10 scale, one decimal
    pub physical_risk_score: f64,
    /// Exactly 44 entries keyed M01..M44
    pub measures: BTreeMap<String, MeasureResult>,
    pub total_measures_assessed: usize,
    pub assessed_at: DateTime<Utc>,
    /// Human-readable description of the scoring method
    pub assessment_method: String,
}

/// Error types for the scoring pipeline
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Discovery error: {0}")]
    Discovery(#[from] clarima_discovery::DiscoveryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(Box<clarima_core::ClarimaError>),
}

impl From<clarima_core::ClarimaError> for ScoringError {
    fn from(err: clarima_core::ClarimaError) -> Self {
        ScoringError::Core(Box::new(err))
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_parses_case_insensitively() {
        assert_eq!(Confidence::parse("HIGH"), Confidence::High);
        assert_eq!(Confidence::parse(" medium "), Confidence::Medium);
        assert_eq!(Confidence::parse("n/a"), Confidence::Unknown);
        assert_eq!(Confidence::parse(""), Confidence::Unknown);
    }

    #[test]
    fn default_result_scores_zero() {
        let result = MeasureResult::default_for("M07", "No assessment provided", "test-model");
        assert_eq!(result.score, 0);
        assert_eq!(result.confidence, Confidence::Unknown);
        assert_eq!(result.measure_id, "M07");
    }
}
