//! End-to-end assessment pipeline
//!
//! Discovery feeds a shared document corpus into five batched scoring
//! calls, the batch results are merged, weak measures get one retry pass,
//! and the aggregate is persisted. A single failed batch degrades to
//! default scores; the pipeline errors only when every batch fails.

use crate::aggregator;
use crate::llm::TextGenerator;
use crate::measures::{MeasureBatch, BATCHES, BATCH_COUNT};
use crate::parser::parse_batch_response;
use crate::prompts::{
    self, build_batch_prompt, CorpusEntry, DEFAULT_METHODOLOGY, SCORING_SYSTEM_PROMPT,
};
use crate::retry;
use crate::storage::AssessmentStore;
use crate::types::{Assessment, MeasureResult, ScoringError, ScoringResult};
use clarima_core::{ClarimaConfig, CompanyProfile, JobStatus};
use clarima_discovery::{AdaptiveSearchController, ContentExtractor, Document, SearchProvider};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

const ASSESSMENT_METHOD: &str = "batched-web-evidence";

pub struct AssessmentPipeline {
    search: Arc<dyn SearchProvider>,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn AssessmentStore>,
    extractor: Option<Arc<dyn ContentExtractor>>,
    config: ClarimaConfig,
    methodology: String,
}

impl AssessmentPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn AssessmentStore>,
        config: ClarimaConfig,
    ) -> Self {
        Self {
            search,
            generator,
            store,
            extractor: None,
            config,
            methodology: DEFAULT_METHODOLOGY.to_string(),
        }
    }

    /// Enable content extraction for the top documents in the corpus
    pub fn with_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replace the built-in methodology text
    pub fn with_methodology(mut self, methodology: impl Into<String>) -> Self {
        self.methodology = methodology.into();
        self
    }

    /// Run the full assessment for one company.
    pub async fn assess(&self, company: &CompanyProfile) -> ScoringResult<Assessment> {
        self.store
            .set_job_status(&company.name, JobStatus::Processing)
            .await?;

        match self.run(company).await {
            Ok(assessment) => {
                self.store.save_assessment(&assessment).await?;
                self.store
                    .set_job_status(&company.name, JobStatus::Completed)
                    .await?;
                Ok(assessment)
            }
            Err(e) => {
                self.store
                    .set_job_status(&company.name, JobStatus::Failed)
                    .await?;
                Err(e)
            }
        }
    }

    async fn run(&self, company: &CompanyProfile) -> ScoringResult<Assessment> {
        let documents = self.discover_documents(company).await?;
        info!(
            company = %company.name,
            documents = documents.len(),
            "Document discovery complete"
        );

        let entries = self.build_corpus_entries(documents).await;
        let corpus_text =
            prompts::format_document_corpus(&entries, self.config.scoring.corpus_char_budget);

        let mut results = self.score_all_batches(company, &corpus_text).await?;

        if self.config.scoring.enable_retry_pass {
            self.retry_weak_measures(company, &corpus_text, &mut results)
                .await;
        }

        aggregator::aggregate(company, results, ASSESSMENT_METHOD)
    }

    async fn discover_documents(&self, company: &CompanyProfile) -> ScoringResult<Vec<Document>> {
        let controller = AdaptiveSearchController::new(
            Arc::clone(&self.search),
            self.config.discovery.clone(),
        );
        let mut documents = controller
            .discover(&company.name, company.isin.as_deref())
            .await?;
        // Stable corpus ordering keeps prompts repeatable run to run
        documents.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(documents)
    }

    async fn build_corpus_entries(&self, documents: Vec<Document>) -> Vec<CorpusEntry> {
        let mut entries: Vec<CorpusEntry> = documents.into_iter().map(CorpusEntry::new).collect();

        if let Some(extractor) = &self.extractor {
            if self.config.discovery.extract_content {
                let top_n = self.config.discovery.extract_top_n.min(entries.len());
                for entry in entries.iter_mut().take(top_n) {
                    entry.extract = extractor.extract(&entry.document.url).await;
                }
                let extracted = entries.iter().filter(|e| e.extract.is_some()).count();
                info!(extracted, attempted = top_n, "Content extraction complete");
            }
        }
        entries
    }

    async fn score_all_batches(
        &self,
        company: &CompanyProfile,
        corpus_text: &str,
    ) -> ScoringResult<BTreeMap<String, MeasureResult>> {
        let max_concurrent = self.config.scoring.max_concurrent_batches.max(1);

        let batch_results: Vec<(u8, BTreeMap<String, MeasureResult>, bool)> =
            stream::iter(BATCHES.iter())
                .map(|batch| self.score_batch(company, corpus_text, batch))
                .buffer_unordered(max_concurrent)
                .collect()
                .await;

        let failed = batch_results.iter().filter(|(_, _, ok)| !ok).count();
        if failed == BATCH_COUNT {
            return Err(ScoringError::Llm(
                "All scoring batches failed".to_string(),
            ));
        }
        if failed > 0 {
            warn!(failed, "Some batches failed and were defaulted to zero scores");
        }

        let mut merged = BTreeMap::new();
        for (_, results, _) in batch_results {
            merged.extend(results);
        }
        Ok(merged)
    }

    /// Score one batch. Returns `(batch number, results, succeeded)`; an LLM
    /// failure produces default results rather than an error.
    async fn score_batch(
        &self,
        company: &CompanyProfile,
        corpus_text: &str,
        batch: &MeasureBatch,
    ) -> (u8, BTreeMap<String, MeasureResult>, bool) {
        let prompt = build_batch_prompt(
            company,
            corpus_text,
            &self.methodology,
            batch.number,
            batch.measure_ids,
            &self.config.scoring,
        );
        info!(
            batch = batch.number,
            measures = batch.measure_ids.len(),
            prompt_chars = prompt.len(),
            "Scoring batch"
        );

        match self.generator.generate(SCORING_SYSTEM_PROMPT, &prompt).await {
            Ok(response) => {
                let results = parse_batch_response(
                    &response,
                    batch.measure_ids,
                    &self.generator.model_identifier(),
                );
                (batch.number, results, true)
            }
            Err(e) => {
                warn!(batch = batch.number, error = %e, "Batch scoring call failed");
                let results = batch
                    .measure_ids
                    .iter()
                    .map(|id| {
                        (
                            id.to_string(),
                            MeasureResult::default_for(
                                id,
                                "Assessment failed: scoring call errored",
                                &self.generator.model_identifier(),
                            ),
                        )
                    })
                    .collect();
                (batch.number, results, false)
            }
        }
    }

    /// One extra pass over measures that scored 0 or returned almost no
    /// evidence. Retries run per batch, sequentially, and only replace the
    /// first-pass result when they improve on it.
    async fn retry_weak_measures(
        &self,
        company: &CompanyProfile,
        corpus_text: &str,
        results: &mut BTreeMap<String, MeasureResult>,
    ) {
        let candidates = retry::retry_candidates(results);
        if candidates.is_empty() {
            return;
        }
        info!(candidates = candidates.len(), "Running retry pass over weak measures");

        let mut improved_total = 0;
        for batch in &BATCHES {
            let retry_ids: Vec<&str> = batch
                .measure_ids
                .iter()
                .copied()
                .filter(|id| candidates.iter().any(|c| c == id))
                .collect();
            if retry_ids.is_empty() {
                continue;
            }

            let prompt = build_batch_prompt(
                company,
                corpus_text,
                &self.methodology,
                batch.number,
                &retry_ids,
                &self.config.scoring,
            );

            match self.generator.generate(SCORING_SYSTEM_PROMPT, &prompt).await {
                Ok(response) => {
                    let parsed = parse_batch_response(
                        &response,
                        &retry_ids,
                        &self.generator.model_identifier(),
                    );
                    improved_total += retry::merge_retry_results(results, parsed);
                }
                Err(e) => {
                    warn!(batch = batch.number, error = %e, "Retry call failed, keeping first-pass results");
                }
            }
        }
        info!(improved = improved_total, "Retry pass complete");
    }
}
