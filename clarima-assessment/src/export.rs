//! Tabular measure detail for downstream export
//!
//! The assessment's secondary output: one row per measure, M01..M44, with
//! a stable six-field column order. Rendering to CSV or spreadsheets is a
//! consumer concern; this module only defines the structure.

use crate::measures::all_measure_ids;
use crate::types::Assessment;
use serde::Serialize;

/// Stable column order for the per-measure detail table
pub const DETAIL_COLUMNS: [&str; 6] = [
    "Score",
    "Confidence",
    "Rationale",
    "Evidence",
    "Source",
    "Model",
];

/// One exported detail row. Evidence quotes and source URLs are joined
/// with `|`, mirroring the scoring output contract.
#[derive(Debug, Clone, Serialize)]
pub struct MeasureDetailRow {
    pub measure_id: String,
    pub score: u8,
    pub confidence: String,
    pub rationale: String,
    pub evidence: String,
    pub source: String,
    pub model: String,
}

/// Stable column order for consumers laying out tabular output.
pub fn detail_column_order() -> &'static [&'static str] {
    &DETAIL_COLUMNS
}

/// All 44 detail rows in taxonomy order. Missing measures (which
/// aggregation rejects, but a hand-built assessment might contain) export
/// as empty rows rather than panicking.
pub fn measure_detail_rows(assessment: &Assessment) -> Vec<MeasureDetailRow> {
    all_measure_ids()
        .iter()
        .map(|id| match assessment.measures.get(*id) {
            Some(result) => MeasureDetailRow {
                measure_id: id.to_string(),
                score: result.score,
                confidence: result.confidence.to_string(),
                rationale: result.rationale.clone(),
                evidence: result.evidence.join("|"),
                source: result.sources.join("|"),
                model: result.model.clone(),
            },
            None => MeasureDetailRow {
                measure_id: id.to_string(),
                score: 0,
                confidence: String::new(),
                rationale: String::new(),
                evidence: String::new(),
                source: String::new(),
                model: String::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, MeasureResult, RiskRating};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn full_assessment() -> Assessment {
        let measures: BTreeMap<String, MeasureResult> = all_measure_ids()
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    MeasureResult {
                        measure_id: id.to_string(),
                        score: 2,
                        confidence: Confidence::Medium,
                        rationale: "Documented, with gaps".to_string(),
                        evidence: vec!["Quote A".to_string(), "Quote B".to_string()],
                        sources: vec!["https://a.example.com".to_string()],
                        model: "deepseek-chat".to_string(),
                    },
                )
            })
            .collect();
        Assessment {
            company_name: "Acme Corp".to_string(),
            isin: Some("US0000000000".to_string()),
            overall_risk_rating: RiskRating::Medium,
            physical_risk_score: 5.0,
            measures,
            total_measures_assessed: 44,
            assessed_at: Utc::now(),
            assessment_method: "batched-web-evidence".to_string(),
        }
    }

    #[test]
    fn produces_44_rows_in_taxonomy_order() {
        let rows = measure_detail_rows(&full_assessment());
        assert_eq!(rows.len(), 44);
        assert_eq!(rows[0].measure_id, "M01");
        assert_eq!(rows[43].measure_id, "M44");
        for window in rows.windows(2) {
            assert!(window[0].measure_id < window[1].measure_id);
        }
    }

    #[test]
    fn joins_evidence_and_sources_with_pipes() {
        let rows = measure_detail_rows(&full_assessment());
        assert_eq!(rows[0].evidence, "Quote A|Quote B");
        assert_eq!(rows[0].source, "https://a.example.com");
        assert_eq!(rows[0].confidence, "Medium");
    }

    #[test]
    fn missing_measure_exports_as_empty_row() {
        let mut assessment = full_assessment();
        assessment.measures.remove("M07");
        let rows = measure_detail_rows(&assessment);
        assert_eq!(rows.len(), 44);
        let row = rows.iter().find(|r| r.measure_id == "M07").unwrap();
        assert_eq!(row.score, 0);
        assert!(row.model.is_empty());
    }

    #[test]
    fn column_order_is_stable() {
        assert_eq!(
            detail_column_order(),
            &["Score", "Confidence", "Rationale", "Evidence", "Source", "Model"]
        );
    }
}
