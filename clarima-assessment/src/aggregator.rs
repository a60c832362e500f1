//! Aggregation of per-measure scores into the headline result
//!
//! The physical risk score rescales the 0-4 measure average onto a 0-10
//! scale (average * 2.5, rounded to one decimal). Higher scores mean
//! stronger demonstrated practice, so they map to LOWER risk.

use crate::measures::{all_measure_ids, MEASURE_COUNT};
use crate::types::{Assessment, MeasureResult, RiskRating, ScoringError, ScoringResult};
use chrono::Utc;
use clarima_core::CompanyProfile;
use std::collections::BTreeMap;
use tracing::info;

/// Average score at or above which the rating is Low risk
pub const LOW_RISK_THRESHOLD: f64 = 3.0;
/// Average score at or above which the rating is Medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 1.5;

/// Scale factor from the 0-4 measure average to the 0-10 headline score
const PHYSICAL_SCORE_SCALE: f64 = 2.5;

fn rating_for_average(average: f64) -> RiskRating {
    if average >= LOW_RISK_THRESHOLD {
        RiskRating::Low
    } else if average >= MEDIUM_RISK_THRESHOLD {
        RiskRating::Medium
    } else {
        RiskRating::High
    }
}

/// Roll the full measure map up into an [`Assessment`].
///
/// The map must cover every measure in the taxonomy exactly once; a
/// partial map indicates a pipeline bug and is rejected rather than
/// silently averaged over fewer measures.
pub fn aggregate(
    company: &CompanyProfile,
    measures: BTreeMap<String, MeasureResult>,
    assessment_method: &str,
) -> ScoringResult<Assessment> {
    if measures.len() != MEASURE_COUNT {
        return Err(ScoringError::Aggregation(format!(
            "Expected {} measure results, got {}",
            MEASURE_COUNT,
            measures.len()
        )));
    }
    for id in all_measure_ids() {
        if !measures.contains_key(id) {
            return Err(ScoringError::Aggregation(format!(
                "Measure {} missing from results",
                id
            )));
        }
    }

    let total: u32 = measures.values().map(|m| m.score as u32).sum();
    let average = total as f64 / MEASURE_COUNT as f64;
    let physical_risk_score = (average * PHYSICAL_SCORE_SCALE * 10.0).round() / 10.0;
    let overall_risk_rating = rating_for_average(average);

    info!(
        company = %company.name,
        total_score = total,
        physical_risk_score,
        rating = %overall_risk_rating,
        "Aggregated assessment"
    );

    Ok(Assessment {
        company_name: company.name.clone(),
        isin: company.isin.clone(),
        overall_risk_rating,
        physical_risk_score,
        measures,
        total_measures_assessed: MEASURE_COUNT,
        assessed_at: Utc::now(),
        assessment_method: assessment_method.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    fn uniform_results(score: u8) -> BTreeMap<String, MeasureResult> {
        all_measure_ids()
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    MeasureResult {
                        measure_id: id.to_string(),
                        score,
                        confidence: Confidence::Medium,
                        rationale: "r".to_string(),
                        evidence: vec!["e".to_string()],
                        sources: vec![],
                        model: "m".to_string(),
                    },
                )
            })
            .collect()
    }

    fn company() -> CompanyProfile {
        CompanyProfile::new("Acme Corp")
    }

    #[test]
    fn uniform_twos_give_medium_rating_and_five_point_zero() {
        let assessment = aggregate(&company(), uniform_results(2), "batched").unwrap();
        assert_eq!(assessment.physical_risk_score, 5.0);
        assert_eq!(assessment.overall_risk_rating, RiskRating::Medium);
        assert_eq!(assessment.total_measures_assessed, 44);
    }

    #[test]
    fn rating_boundaries() {
        assert_eq!(rating_for_average(3.0), RiskRating::Low);
        assert_eq!(rating_for_average(2.999), RiskRating::Medium);
        assert_eq!(rating_for_average(1.5), RiskRating::Medium);
        assert_eq!(rating_for_average(1.49), RiskRating::High);
        assert_eq!(rating_for_average(0.0), RiskRating::High);
        assert_eq!(rating_for_average(4.0), RiskRating::Low);
    }

    #[test]
    fn physical_score_rounds_to_one_decimal() {
        // 43 zeros and one 3: average 3/44 = 0.0681..., * 2.5 = 0.1704... -> 0.2
        let mut results = uniform_results(0);
        results.get_mut("M01").unwrap().score = 3;
        let assessment = aggregate(&company(), results, "batched").unwrap();
        assert_eq!(assessment.physical_risk_score, 0.2);
        assert_eq!(assessment.overall_risk_rating, RiskRating::High);
    }

    #[test]
    fn partial_map_is_rejected() {
        let mut results = uniform_results(2);
        results.remove("M44");
        let err = aggregate(&company(), results, "batched").unwrap_err();
        assert!(matches!(err, ScoringError::Aggregation(_)));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let mut results = uniform_results(2);
        let orphan = results.remove("M44").unwrap();
        results.insert("M99".to_string(), orphan);
        assert!(aggregate(&company(), results, "batched").is_err());
    }
}
