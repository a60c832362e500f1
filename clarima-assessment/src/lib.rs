//! Batched physical climate risk scoring
//!
//! This crate turns a discovered document corpus into a 44-measure
//! assessment: five fixed batches of measures are scored by an LLM against
//! a shared evidence corpus, tolerantly parsed, retried where weak, and
//! aggregated into a headline physical risk score and rating.
//!
//! # Example
//!
//! ```rust,no_run
//! use clarima_assessment::{AssessmentPipeline, MemoryStore, SiumaiGenerator};
//! use clarima_core::{ClarimaConfig, CompanyProfile};
//! use clarima_discovery::BraveSearchClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClarimaConfig::default();
//! let search = Arc::new(BraveSearchClient::new(&config.search)?);
//! let generator = Arc::new(SiumaiGenerator::new(&config.llm).await?);
//! let store = Arc::new(MemoryStore::new());
//!
//! let pipeline = AssessmentPipeline::new(search, generator, store, config);
//! let assessment = pipeline
//!     .assess(&CompanyProfile::new("Acme Corp").with_isin("US0000000000"))
//!     .await?;
//! println!("{}: {}", assessment.company_name, assessment.overall_risk_rating);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod export;
pub mod llm;
pub mod measures;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod storage;
pub mod types;

pub use aggregator::{aggregate, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use export::{detail_column_order, measure_detail_rows, MeasureDetailRow, DETAIL_COLUMNS};
pub use llm::{SiumaiGenerator, TextGenerator};
pub use measures::{all_measure_ids, display_name, MeasureBatch, MeasureDefinition, BATCHES, BATCH_COUNT, MEASURES, MEASURE_COUNT};
pub use parser::{extract_measures, parse_batch_response, ParsedBatch};
pub use pipeline::AssessmentPipeline;
pub use prompts::{build_batch_prompt, format_document_corpus, CorpusEntry, DEFAULT_METHODOLOGY, SCORING_SYSTEM_PROMPT};
pub use storage::{write_assessment_json, AssessmentStore, MemoryStore};
pub use types::{Assessment, Confidence, MeasureResult, RiskRating, ScoringError, ScoringResult};
