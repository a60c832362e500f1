//! Assessment persistence seam
//!
//! The pipeline records job status and finished assessments through
//! [`AssessmentStore`]. The in-memory implementation backs the CLI and
//! tests; a deployment can plug in a database-backed store instead.

use crate::types::{Assessment, ScoringError, ScoringResult};
use clarima_core::JobStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait::async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Record the status of an assessment job, keyed by company name
    async fn set_job_status(&self, company_name: &str, status: JobStatus) -> ScoringResult<()>;

    async fn job_status(&self, company_name: &str) -> ScoringResult<Option<JobStatus>>;

    /// Persist a completed assessment, replacing any previous one
    async fn save_assessment(&self, assessment: &Assessment) -> ScoringResult<()>;

    async fn load_assessment(&self, company_name: &str) -> ScoringResult<Option<Assessment>>;

    /// Company names with a stored assessment, in sorted order
    async fn list_companies(&self) -> ScoringResult<Vec<String>>;
}

/// In-memory store used by the CLI and the test suite
#[derive(Default)]
pub struct MemoryStore {
    assessments: Arc<RwLock<BTreeMap<String, Assessment>>>,
    statuses: Arc<RwLock<BTreeMap<String, JobStatus>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AssessmentStore for MemoryStore {
    async fn set_job_status(&self, company_name: &str, status: JobStatus) -> ScoringResult<()> {
        self.statuses
            .write()
            .await
            .insert(company_name.to_string(), status);
        Ok(())
    }

    async fn job_status(&self, company_name: &str) -> ScoringResult<Option<JobStatus>> {
        Ok(self.statuses.read().await.get(company_name).copied())
    }

    async fn save_assessment(&self, assessment: &Assessment) -> ScoringResult<()> {
        self.assessments
            .write()
            .await
            .insert(assessment.company_name.clone(), assessment.clone());
        Ok(())
    }

    async fn load_assessment(&self, company_name: &str) -> ScoringResult<Option<Assessment>> {
        Ok(self.assessments.read().await.get(company_name).cloned())
    }

    async fn list_companies(&self) -> ScoringResult<Vec<String>> {
        Ok(self.assessments.read().await.keys().cloned().collect())
    }
}

/// File-backed convenience: write an assessment as pretty JSON.
pub async fn write_assessment_json(
    assessment: &Assessment,
    path: &std::path::Path,
) -> ScoringResult<()> {
    let json = serde_json::to_string_pretty(assessment)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ScoringError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(())
}
