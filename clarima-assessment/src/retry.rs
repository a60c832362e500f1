//! Second-pass retry over weak measures
//!
//! After the first full pass, measures that scored 0 or carry almost no
//! evidence get one more attempt. A retry result only replaces the
//! original when it is genuinely better.

use crate::types::MeasureResult;
use std::collections::BTreeMap;

/// Evidence below this length (all quotes concatenated, trimmed) marks a
/// result as weak enough to retry
const MIN_EVIDENCE_CHARS: usize = 50;

/// Retry replaces the original on a strictly higher score, or on the same
/// score with substantially more evidence
const EVIDENCE_IMPROVEMENT_FACTOR: f64 = 1.5;

fn trimmed_evidence_len(result: &MeasureResult) -> usize {
    // The zero-evidence placeholder does not count as evidence
    if result.evidence == ["No evidence found"] {
        return 0;
    }
    result.evidence.iter().map(|quote| quote.trim().len()).sum()
}

/// Measures worth a second pass: scored 0, or scored with thin evidence.
pub fn retry_candidates(results: &BTreeMap<String, MeasureResult>) -> Vec<String> {
    results
        .values()
        .filter(|result| result.score == 0 || trimmed_evidence_len(result) < MIN_EVIDENCE_CHARS)
        .map(|result| result.measure_id.clone())
        .collect()
}

/// Whether `retried` should replace `original`.
pub fn is_better_result(retried: &MeasureResult, original: &MeasureResult) -> bool {
    if retried.score > original.score {
        return true;
    }
    if retried.score == original.score {
        let original_len = trimmed_evidence_len(original);
        let retried_len = trimmed_evidence_len(retried);
        return retried_len as f64 >= original_len as f64 * EVIDENCE_IMPROVEMENT_FACTOR
            && retried_len > original_len;
    }
    false
}

/// Merge retry results back, keeping whichever result is better per measure.
pub fn merge_retry_results(
    results: &mut BTreeMap<String, MeasureResult>,
    retried: BTreeMap<String, MeasureResult>,
) -> usize {
    let mut improved = 0;
    for (id, candidate) in retried {
        if let Some(original) = results.get(&id) {
            if is_better_result(&candidate, original) {
                results.insert(id, candidate);
                improved += 1;
            }
        }
    }
    improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    fn result(id: &str, score: u8, evidence: &[&str]) -> MeasureResult {
        MeasureResult {
            measure_id: id.to_string(),
            score,
            confidence: Confidence::Medium,
            rationale: "r".to_string(),
            evidence: evidence.iter().map(|s| s.to_string()).collect(),
            sources: vec![],
            model: "m".to_string(),
        }
    }

    #[test]
    fn zero_scores_and_thin_evidence_are_candidates() {
        let mut results = BTreeMap::new();
        results.insert("M01".to_string(), result("M01", 0, &["No evidence found"]));
        results.insert("M02".to_string(), result("M02", 2, &["short"]));
        results.insert(
            "M03".to_string(),
            result(
                "M03",
                3,
                &["A substantial verbatim quote describing the company's flood defences."],
            ),
        );

        let candidates = retry_candidates(&results);
        assert_eq!(candidates, vec!["M01", "M02"]);
    }

    #[test]
    fn higher_score_always_wins() {
        let original = result("M01", 1, &["a long and detailed original quote about risk"]);
        let retried = result("M01", 2, &["x"]);
        assert!(is_better_result(&retried, &original));
    }

    #[test]
    fn same_score_needs_substantially_more_evidence() {
        let original = result("M01", 2, &["twenty characters aa"]);
        let slightly_longer = result("M01", 2, &["twenty characters aa plus"]);
        let much_longer = result(
            "M01",
            2,
            &["twenty characters aa repeated twice over for emphasis here"],
        );
        assert!(!is_better_result(&slightly_longer, &original));
        assert!(is_better_result(&much_longer, &original));
    }

    #[test]
    fn lower_score_never_replaces() {
        let original = result("M01", 3, &["x"]);
        let retried = result(
            "M01",
            1,
            &["an enormous quantity of evidence does not rescue a lower score at all"],
        );
        assert!(!is_better_result(&retried, &original));
    }

    #[test]
    fn merge_counts_only_improvements() {
        let mut results = BTreeMap::new();
        results.insert("M01".to_string(), result("M01", 0, &["No evidence found"]));
        results.insert("M02".to_string(), result("M02", 3, &["good evidence here"]));

        let mut retried = BTreeMap::new();
        retried.insert(
            "M01".to_string(),
            result("M01", 2, &["a freshly found disclosure quote"]),
        );
        retried.insert("M02".to_string(), result("M02", 1, &["worse"]));

        let improved = merge_retry_results(&mut results, retried);
        assert_eq!(improved, 1);
        assert_eq!(results["M01"].score, 2);
        assert_eq!(results["M02"].score, 3);
    }
}
