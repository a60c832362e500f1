//! The 44-measure physical-climate-risk taxonomy and its 5-batch partition
//!
//! The taxonomy is static: 44 measures M01..M44, split into 5 fixed batches
//! sized {9, 9, 10, 9, 7}. Batch numbering 1-5 is referenced in prompts and
//! logs and must not change.

/// Total number of scored measures
pub const MEASURE_COUNT: usize = 44;

/// Number of scoring batches
pub const BATCH_COUNT: usize = 5;

/// Static definition of one scored measure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// A fixed, non-overlapping subset of measures scored in one model call
#[derive(Debug, Clone, Copy)]
pub struct MeasureBatch {
    /// 1-based batch number, fixed
    pub number: u8,
    pub measure_ids: &'static [&'static str],
}

pub const MEASURES: [MeasureDefinition; MEASURE_COUNT] = [
    MeasureDefinition { id: "M01", display_name: "Board Oversight of Physical Climate Risk" },
    MeasureDefinition { id: "M02", display_name: "Senior Management Responsibility for Physical Climate Risk" },
    MeasureDefinition { id: "M03", display_name: "Integration of Physical Climate Risks into Enterprise Risk Management" },
    MeasureDefinition { id: "M04", display_name: "Physical Climate Risk Strategy and Planning" },
    MeasureDefinition { id: "M05", display_name: "Physical Climate Risk Governance Structure" },
    MeasureDefinition { id: "M06", display_name: "Identification of Acute Physical Risks" },
    MeasureDefinition { id: "M07", display_name: "Identification of Chronic Physical Risks" },
    MeasureDefinition { id: "M08", display_name: "Geographic Exposure Assessment" },
    MeasureDefinition { id: "M09", display_name: "Scenario Analysis for Physical Climate Risks" },
    MeasureDefinition { id: "M10", display_name: "Quantification of Physical Climate Risk Exposure" },
    MeasureDefinition { id: "M11", display_name: "Assessment of Asset-Level Vulnerability" },
    MeasureDefinition { id: "M12", display_name: "Assessment of Supply Chain Vulnerability to Physical Risks" },
    MeasureDefinition { id: "M13", display_name: "Assessment of Operational Vulnerability" },
    MeasureDefinition { id: "M14", display_name: "Financial Impact Assessment of Physical Risks" },
    MeasureDefinition { id: "M15", display_name: "Climate-Resilient Asset Design and Construction" },
    MeasureDefinition { id: "M16", display_name: "Infrastructure Hardening and Adaptation Measures" },
    MeasureDefinition { id: "M17", display_name: "Relocation or Divestment of High-Risk Assets" },
    MeasureDefinition { id: "M18", display_name: "Nature-Based Solutions for Physical Risk Mitigation" },
    MeasureDefinition { id: "M19", display_name: "Emergency Preparedness and Response Plans" },
    MeasureDefinition { id: "M20", display_name: "Business Continuity Planning for Physical Climate Events" },
    MeasureDefinition { id: "M21", display_name: "Crisis Communication Protocols" },
    MeasureDefinition { id: "M22", display_name: "Post-Event Recovery and Restoration Capabilities" },
    MeasureDefinition { id: "M23", display_name: "Supply Chain Resilience and Diversification" },
    MeasureDefinition { id: "M24", display_name: "Supplier Climate Risk Assessment" },
    MeasureDefinition { id: "M25", display_name: "Alternative Sourcing Strategies" },
    MeasureDefinition { id: "M26", display_name: "Insurance Coverage for Physical Climate Risks" },
    MeasureDefinition { id: "M27", display_name: "Risk Transfer Mechanisms" },
    MeasureDefinition { id: "M28", display_name: "Self-Insurance and Reserves" },
    MeasureDefinition { id: "M29", display_name: "Climate Data Quality and Sources" },
    MeasureDefinition { id: "M30", display_name: "Third-Party Verification and Assurance" },
    MeasureDefinition { id: "M31", display_name: "Workforce Safety and Health Protocols" },
    MeasureDefinition { id: "M32", display_name: "Community Engagement and Support" },
    MeasureDefinition { id: "M33", display_name: "Just Transition Considerations" },
    MeasureDefinition { id: "M34", display_name: "Physical Risk KPIs and Metrics" },
    MeasureDefinition { id: "M35", display_name: "Target Setting for Physical Risk Reduction" },
    MeasureDefinition { id: "M36", display_name: "Monitoring and Reporting of Physical Risk Performance" },
    MeasureDefinition { id: "M37", display_name: "Disclosure Alignment with TCFD and Other Frameworks" },
    MeasureDefinition { id: "M38", display_name: "Demonstrated Reduction in Physical Risk Exposure" },
    MeasureDefinition { id: "M39", display_name: "Avoided Losses from Physical Climate Events" },
    MeasureDefinition { id: "M40", display_name: "Improved Asset Resilience Metrics" },
    MeasureDefinition { id: "M41", display_name: "Enhanced Operational Continuity" },
    MeasureDefinition { id: "M42", display_name: "Stakeholder Confidence and Reputation" },
    MeasureDefinition { id: "M43", display_name: "Regulatory Compliance and Preparedness" },
    MeasureDefinition { id: "M44", display_name: "Long-term Value Creation and Sustainability" },
];

pub const BATCHES: [MeasureBatch; BATCH_COUNT] = [
    // Governance & strategic oversight
    MeasureBatch {
        number: 1,
        measure_ids: &["M01", "M02", "M03", "M04", "M05", "M06", "M07", "M08", "M09"],
    },
    // Risk identification & assessment
    MeasureBatch {
        number: 2,
        measure_ids: &["M10", "M11", "M12", "M13", "M14", "M15", "M16", "M17", "M18"],
    },
    // Asset design, crisis management, supply chain
    MeasureBatch {
        number: 3,
        measure_ids: &["M19", "M20", "M21", "M22", "M23", "M24", "M25", "M26", "M27", "M28"],
    },
    // Insurance, data quality, workforce
    MeasureBatch {
        number: 4,
        measure_ids: &["M29", "M30", "M31", "M32", "M33", "M34", "M35", "M36", "M37"],
    },
    // KPIs & outcomes
    MeasureBatch {
        number: 5,
        measure_ids: &["M38", "M39", "M40", "M41", "M42", "M43", "M44"],
    },
];

/// Display name for a measure id, or `None` for an unknown id
pub fn display_name(measure_id: &str) -> Option<&'static str> {
    MEASURES
        .iter()
        .find(|m| m.id == measure_id)
        .map(|m| m.display_name)
}

/// All 44 measure ids in canonical M01..M44 order
pub fn all_measure_ids() -> Vec<&'static str> {
    MEASURES.iter().map(|m| m.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn batches_partition_the_taxonomy_exactly() {
        let mut seen = BTreeSet::new();
        for batch in &BATCHES {
            for id in batch.measure_ids {
                assert!(seen.insert(*id), "duplicate measure id {id} across batches");
            }
        }
        let expected: BTreeSet<&str> = all_measure_ids().into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn batch_sizes_are_fixed() {
        let sizes: Vec<usize> = BATCHES.iter().map(|b| b.measure_ids.len()).collect();
        assert_eq!(sizes, vec![9, 9, 10, 9, 7]);
    }

    #[test]
    fn batch_numbers_are_one_through_five() {
        let numbers: Vec<u8> = BATCHES.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn every_measure_has_a_display_name() {
        for id in all_measure_ids() {
            assert!(display_name(id).is_some());
        }
        assert!(display_name("M99").is_none());
    }

    #[test]
    fn ids_are_contiguous_and_zero_padded() {
        for (i, measure) in MEASURES.iter().enumerate() {
            assert_eq!(measure.id, format!("M{:02}", i + 1));
        }
    }
}
