use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentMode, FormValues};
use crate::governance::regulation::Regulation;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::SystemId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DraftId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Autosaved, unvalidated answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft_id: DraftId,
    pub regulation: Regulation,
    pub mode: AssessmentMode,
    pub values: FormValues,
    pub saved_at: DateTime<Utc>,
}

/// Answers that passed the mode's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: SubmissionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_id: Option<SystemId>,
    pub regulation: Regulation,
    pub mode: AssessmentMode,
    pub values: FormValues,
    pub submitted_at: DateTime<Utc>,
}

/// Storage abstraction for drafts and accepted questionnaires.
pub trait AssessmentRepository: Send + Sync {
    /// Insert or overwrite a draft.
    fn save_draft(&self, draft: DraftRecord) -> Result<DraftRecord, RepositoryError>;
    fn fetch_draft(&self, id: &DraftId) -> Result<Option<DraftRecord>, RepositoryError>;
    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError>;
}
