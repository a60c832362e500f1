//! Integration tests for the adaptive search controller

use async_trait::async_trait;
use clarima_core::DiscoveryConfig;
use clarima_discovery::{
    AdaptiveSearchController, DiscoveryError, DiscoveryResult, SearchHit, SearchProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn test_config() -> DiscoveryConfig {
    DiscoveryConfig {
        max_iterations: 10,
        max_documents: 150,
        results_per_query: 20,
        query_delay_ms: 0,
        extract_content: false,
        extract_top_n: 5,
    }
}

fn hit(url: &str, title: &str, snippet: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        snippet: snippet.to_string(),
    }
}

/// Returns a fixed set of accepted hits (plus rejects) on the first
/// iteration's queries, then the same URLs forever after. Identifier
/// lookups return nothing.
struct RepeatingSearch {
    calls: AtomicUsize,
}

impl RepeatingSearch {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn fixed_hits() -> Vec<SearchHit> {
        vec![
            hit(
                "https://acme.example.com/tcfd-report",
                "Acme TCFD report",
                "Acme physical climate risk disclosure",
            ),
            hit(
                "https://acme.example.com/sustainability",
                "Acme sustainability",
                "Acme climate resilience program",
            ),
            hit(
                "https://news.example.org/acme-flood",
                "Acme flood exposure",
                "Acme sites face extreme weather risk",
            ),
            hit(
                "https://filings.example.net/acme-10k",
                "Acme annual filing",
                "Acme climate adaptation spending",
            ),
            hit(
                "https://esg.example.io/acme",
                "Acme ESG profile",
                "Acme climate risk summary",
            ),
            // Rejected: generic reference domain
            hit(
                "https://en.wikipedia.org/wiki/Acme",
                "Acme climate entry",
                "Acme climate history",
            ),
            // Rejected: name match without topical context
            hit(
                "https://jobs.example.com/acme",
                "Acme is hiring",
                "Join the Acme team downtown",
            ),
        ]
    }
}

#[async_trait]
impl SearchProvider for RepeatingSearch {
    async fn search(&self, query: &str, _max_results: usize) -> DiscoveryResult<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.contains("company name") {
            return Ok(vec![]);
        }
        Ok(Self::fixed_hits())
    }
}

#[tokio::test]
async fn discovery_terminates_after_two_empty_iterations() {
    let provider = Arc::new(RepeatingSearch::new());
    let controller = AdaptiveSearchController::new(provider.clone(), test_config());

    let documents = controller
        .discover("Acme Corp", Some("US0000000000"))
        .await
        .expect("discovery should succeed");

    // 5 accepted on iteration 1; iterations 2 and 3 add nothing and the
    // exhaustion rule stops the loop at iteration 3
    assert_eq!(documents.len(), 5);

    // identifier lookup + 3 queries per iteration over 3 iterations
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1 + 9);
}

#[tokio::test]
async fn discovery_deduplicates_across_queries_and_iterations() {
    let provider = Arc::new(RepeatingSearch::new());
    let controller = AdaptiveSearchController::new(provider, test_config());

    let documents = controller
        .discover("Acme Corp", None)
        .await
        .expect("discovery should succeed");

    let mut urls: Vec<&str> = documents.iter().map(|d| d.url.as_str()).collect();
    let before = urls.len();
    urls.sort();
    urls.dedup();
    assert_eq!(before, urls.len(), "no duplicate URLs in discovery output");
}

/// Every query always errors; the run terminates through the
/// empty-iteration rule instead of aborting.
struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> DiscoveryResult<Vec<SearchHit>> {
        Err(DiscoveryError::Search("simulated outage".to_string()))
    }
}

#[tokio::test]
async fn total_search_failure_counts_as_empty_iterations() {
    let controller = AdaptiveSearchController::new(Arc::new(FailingSearch), test_config());

    let documents = controller
        .discover("Acme Corp", None)
        .await
        .expect("query failures must not abort the session");

    assert!(documents.is_empty());
}

/// Unbounded stream of unique accepted URLs to exercise the document cap.
struct EndlessSearch {
    counter: AtomicUsize,
}

#[async_trait]
impl SearchProvider for EndlessSearch {
    async fn search(&self, query: &str, max_results: usize) -> DiscoveryResult<Vec<SearchHit>> {
        if query.contains("company name") {
            return Ok(vec![]);
        }
        let hits = (0..max_results)
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                hit(
                    &format!("https://docs.example.com/acme-{n}"),
                    "Acme climate disclosure",
                    "Acme physical climate risk",
                )
            })
            .collect();
        Ok(hits)
    }
}

#[tokio::test]
async fn discovery_respects_document_cap() {
    let mut config = test_config();
    config.max_documents = 12;

    let controller = AdaptiveSearchController::new(
        Arc::new(EndlessSearch {
            counter: AtomicUsize::new(0),
        }),
        config,
    );

    let documents = controller.discover("Acme Corp", None).await.unwrap();
    assert_eq!(documents.len(), 12);
}

#[tokio::test]
async fn discovery_respects_iteration_cap() {
    // One new document per iteration keeps the exhaustion rule from firing
    struct OnePerIteration {
        counter: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for OnePerIteration {
        async fn search(&self, query: &str, _max: usize) -> DiscoveryResult<Vec<SearchHit>> {
            if query.contains("company name") {
                return Ok(vec![]);
            }
            // Same URL for all three queries within an iteration; a new one
            // each time the first query of an iteration runs
            let n = self.counter.load(Ordering::SeqCst) / 3;
            self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![hit(
                &format!("https://docs.example.com/acme-{n}"),
                "Acme climate report",
                "Acme physical climate risk",
            )])
        }
    }

    let mut config = test_config();
    config.max_iterations = 4;

    let controller = AdaptiveSearchController::new(
        Arc::new(OnePerIteration {
            counter: AtomicUsize::new(0),
        }),
        config,
    );

    let documents = controller.discover("Acme Corp", None).await.unwrap();
    assert_eq!(documents.len(), 4);
}
