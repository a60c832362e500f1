//! Adaptive exhaustive document search
//!
//! Iterates (generate queries → search → filter → deduplicate) until the
//! search is exhausted: two consecutive iterations without a new document,
//! the iteration cap, or the document cap.

use crate::name_variations;
use crate::queries::QueryTemplateGenerator;
use crate::relevance;
use crate::search::SearchProvider;
use crate::types::{normalize_url, DiscoveryResult, DiscoverySession, Document};
use clarima_core::DiscoveryConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Consecutive empty iterations that mark the search as exhausted
const EXHAUSTION_THRESHOLD: u32 = 2;

/// Owns the discovery state machine for one run at a time
pub struct AdaptiveSearchController {
    provider: Arc<dyn SearchProvider>,
    config: DiscoveryConfig,
}

impl AdaptiveSearchController {
    pub fn new(provider: Arc<dyn SearchProvider>, config: DiscoveryConfig) -> Self {
        Self { provider, config }
    }

    /// Discover a bounded, deduplicated set of relevant documents.
    ///
    /// The returned order reflects discovery, which is not stable
    /// run-to-run; callers needing determinism must re-sort (e.g. by URL).
    pub async fn discover(
        &self,
        company_name: &str,
        identifier: Option<&str>,
    ) -> DiscoveryResult<Vec<Document>> {
        info!(company = company_name, "Starting adaptive document search");

        let variations =
            name_variations::resolve(company_name, identifier, self.provider.as_ref()).await;
        debug!(company = company_name, ?variations, "Resolved name variations");

        let generator = QueryTemplateGenerator::new(company_name, identifier);
        let mut session = DiscoverySession::new(company_name, identifier, variations);

        while session.iteration_count < self.config.max_iterations
            && session.documents.len() < self.config.max_documents
        {
            session.iteration_count += 1;
            let iteration = session.iteration_count;

            let queries = generator.queries_for_iteration(iteration);
            let candidates = self.run_iteration(&queries, &session).await;

            let mut added = 0usize;
            for (key, document) in candidates {
                if session.documents.len() >= self.config.max_documents {
                    break;
                }
                if let std::collections::btree_map::Entry::Vacant(entry) =
                    session.documents.entry(key)
                {
                    entry.insert(document);
                    added += 1;
                }
            }

            info!(
                iteration,
                new_documents = added,
                total = session.documents.len(),
                "Discovery iteration finished"
            );

            if added == 0 {
                session.consecutive_empty_iterations += 1;
                if session.consecutive_empty_iterations >= EXHAUSTION_THRESHOLD {
                    info!(
                        iteration,
                        total = session.documents.len(),
                        "Search exhausted: no new documents for {} consecutive iterations",
                        EXHAUSTION_THRESHOLD
                    );
                    break;
                }
            } else {
                session.consecutive_empty_iterations = 0;
            }
        }

        if session.iteration_count >= self.config.max_iterations {
            warn!(
                max_iterations = self.config.max_iterations,
                "Reached iteration cap before exhaustion"
            );
        }
        if session.documents.len() >= self.config.max_documents {
            warn!(
                max_documents = self.config.max_documents,
                "Reached document cap before exhaustion"
            );
        }

        info!(
            company = company_name,
            iterations = session.iteration_count,
            documents = session.documents.len(),
            "Adaptive document search complete"
        );

        Ok(session.documents.into_values().collect())
    }

    /// Execute one iteration's queries. A failed query is logged and
    /// skipped; it contributes zero documents and therefore still counts
    /// toward the empty-iteration termination logic.
    async fn run_iteration(
        &self,
        queries: &[String],
        session: &DiscoverySession,
    ) -> Vec<(String, Document)> {
        let mut accepted = Vec::new();
        let mut seen_this_iteration = std::collections::BTreeSet::new();

        for query in queries {
            match self
                .provider
                .search(query, self.config.results_per_query)
                .await
            {
                Ok(hits) => {
                    for hit in hits {
                        if !relevance::accept(
                            &hit.url,
                            &hit.title,
                            &hit.snippet,
                            session.identifier.as_deref(),
                            &session.name_variations,
                        ) {
                            continue;
                        }

                        let key = normalize_url(&hit.url);
                        if seen_this_iteration.insert(key.clone()) {
                            accepted.push((
                                key,
                                Document {
                                    url: hit.url,
                                    title: hit.title,
                                    snippet: hit.snippet,
                                    originating_query: query.clone(),
                                },
                            ));
                        }
                    }
                }
                Err(e) => {
                    warn!(query, error = %e, "Query failed, skipping");
                }
            }

            // Rate-limit courtesy, not a correctness requirement
            if self.config.query_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.query_delay_ms)).await;
            }
        }

        accepted
    }
}
