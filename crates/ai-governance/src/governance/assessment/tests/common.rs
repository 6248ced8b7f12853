use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::governance::assessment::autosave::{FormPersister, PersistError};
use crate::governance::assessment::domain::{Answer, FormValues};
use crate::governance::assessment::evidence::{EvidenceCandidate, EvidenceStore, UploadError};
use crate::governance::assessment::repository::{
    AssessmentRepository, DraftId, DraftRecord, SubmissionId, SubmissionRecord,
};
use crate::governance::repository::RepositoryError;

/// Every rapid EU question answered, with no interaction with people.
pub(super) fn eu_rapid_values() -> FormValues {
    FormValues::new()
        .with("q1", Answer::text("Ranks incoming loan applications for manual review"))
        .with("q2", Answer::text("provider"))
        .with("q3", Answer::choices(["essential_services"]))
        .with("q4", Answer::text("no"))
        .with("q7", Answer::text("no"))
        .with("q11", Answer::text("human_in_the_loop"))
}

/// Every required EU question answered for a comprehensive assessment.
pub(super) fn eu_comprehensive_values() -> FormValues {
    eu_rapid_values()
        .with("q5", Answer::text("unsure"))
        .with("q6", Answer::text("no"))
        .with("q8", Answer::text("no"))
        .with("q9", Answer::text("documented"))
        .with("q10", Answer::choices(["personal"]))
        .with("q13", Answer::text("Precision and recall on a held-out quarterly sample"))
        .with("q14", Answer::text("partial"))
        .with("q15", Answer::text("yes"))
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    drafts: Arc<Mutex<HashMap<DraftId, DraftRecord>>>,
    submissions: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl MemoryAssessments {
    pub(super) fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submissions
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl AssessmentRepository for MemoryAssessments {
    fn save_draft(&self, draft: DraftRecord) -> Result<DraftRecord, RepositoryError> {
        let mut guard = self.drafts.lock().expect("repository mutex poisoned");
        guard.insert(draft.draft_id.clone(), draft.clone());
        Ok(draft)
    }

    fn fetch_draft(&self, id: &DraftId) -> Result<Option<DraftRecord>, RepositoryError> {
        let guard = self.drafts.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.submissions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.submission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableAssessments;

impl AssessmentRepository for UnavailableAssessments {
    fn save_draft(&self, _draft: DraftRecord) -> Result<DraftRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_draft(&self, _id: &DraftId) -> Result<Option<DraftRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_submission(
        &self,
        _record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_submission(
        &self,
        _id: &SubmissionId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Persister that records every call. With a gate, each save waits for
/// `release` before finishing.
#[derive(Default, Clone)]
pub(super) struct RecordingPersister {
    calls: Arc<AtomicUsize>,
    saved: Arc<Mutex<Vec<FormValues>>>,
    failure: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl RecordingPersister {
    pub(super) fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub(super) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn saved(&self) -> Vec<FormValues> {
        self.saved.lock().expect("persister mutex poisoned").clone()
    }
}

#[async_trait]
impl FormPersister for RecordingPersister {
    async fn persist(&self, values: FormValues) -> Result<(), PersistError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(message) = &self.failure {
            return Err(PersistError(message.clone()));
        }
        self.saved
            .lock()
            .expect("persister mutex poisoned")
            .push(values);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingStore {
    pub(super) batches: Arc<Mutex<Vec<Vec<String>>>>,
    pub(super) failure: Option<String>,
}

#[async_trait]
impl EvidenceStore for RecordingStore {
    async fn upload(&self, files: &[EvidenceCandidate]) -> Result<(), UploadError> {
        if let Some(message) = &self.failure {
            return Err(UploadError(message.clone()));
        }
        self.batches
            .lock()
            .expect("store mutex poisoned")
            .push(files.iter().map(|file| file.name.clone()).collect());
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
