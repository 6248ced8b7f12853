use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::autosave::{FormPersister, PersistError};
use super::domain::{AssessmentMode, AssessmentSubmission, FormValues};
use super::registry::QuestionRegistry;
use super::repository::{
    AssessmentRepository, DraftId, DraftRecord, SubmissionId, SubmissionRecord,
};
use super::schema::ValidationErrors;
use crate::governance::regulation::Regulation;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::SystemId;

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("asm-{id:06}"))
}

/// Inbound questionnaire payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    pub mode: AssessmentMode,
    #[serde(default)]
    pub system_id: Option<SystemId>,
    pub values: FormValues,
}

/// Validates questionnaires and stores drafts and submissions.
pub struct AssessmentService<R> {
    repository: Arc<R>,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn registry(&self, regulation: Regulation) -> QuestionRegistry {
        QuestionRegistry::for_regulation(regulation)
    }

    pub fn validate(
        &self,
        regulation: Regulation,
        mode: AssessmentMode,
        values: &FormValues,
    ) -> Result<(), ValidationErrors> {
        self.registry(regulation)
            .schema_for_mode(mode)
            .validate(values)
    }

    /// Validate and store a questionnaire. Only answers to questions that
    /// apply in the chosen mode are kept.
    pub fn submit(
        &self,
        regulation: Regulation,
        request: SubmissionRequest,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        let schema = self.registry(regulation).schema_for_mode(request.mode);
        schema.validate(&request.values)?;

        let record = SubmissionRecord {
            submission_id: next_submission_id(),
            system_id: request.system_id,
            regulation,
            mode: request.mode,
            values: schema.retain_active(&request.values),
            submitted_at: Utc::now(),
        };

        let stored = self.repository.insert_submission(record)?;
        info!(
            submission = %stored.submission_id.0,
            regulation = regulation.slug(),
            mode = %stored.mode,
            "assessment submitted"
        );
        Ok(stored)
    }

    /// Store a wizard result that has already been validated client side.
    pub fn submit_wizard(
        &self,
        submission: AssessmentSubmission,
        system_id: Option<SystemId>,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        self.submit(
            submission.regulation,
            SubmissionRequest {
                mode: submission.mode,
                system_id,
                values: submission.values,
            },
        )
    }

    pub fn submission(
        &self,
        id: &SubmissionId,
    ) -> Result<SubmissionRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch_submission(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn save_draft(
        &self,
        draft_id: DraftId,
        regulation: Regulation,
        mode: AssessmentMode,
        values: FormValues,
    ) -> Result<DraftRecord, AssessmentServiceError> {
        let record = DraftRecord {
            draft_id,
            regulation,
            mode,
            values,
            saved_at: Utc::now(),
        };
        Ok(self.repository.save_draft(record)?)
    }

    pub fn draft(&self, draft_id: &DraftId) -> Result<DraftRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch_draft(draft_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Autosave target writing into this service's draft storage.
    pub fn draft_persister(
        self: &Arc<Self>,
        draft_id: DraftId,
        regulation: Regulation,
        mode: AssessmentMode,
    ) -> DraftPersister<R> {
        DraftPersister {
            service: self.clone(),
            draft_id,
            regulation,
            mode,
        }
    }
}

/// [`FormPersister`] that stores snapshots as drafts.
pub struct DraftPersister<R> {
    service: Arc<AssessmentService<R>>,
    draft_id: DraftId,
    regulation: Regulation,
    mode: AssessmentMode,
}

#[async_trait]
impl<R> FormPersister for DraftPersister<R>
where
    R: AssessmentRepository + 'static,
{
    async fn persist(&self, values: FormValues) -> Result<(), PersistError> {
        self.service
            .save_draft(self.draft_id.clone(), self.regulation, self.mode, values)
            .map(|_| ())
            .map_err(|err| PersistError(err.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
