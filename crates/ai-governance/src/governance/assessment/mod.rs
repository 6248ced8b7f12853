//! Regulation questionnaires: catalogs, mode-aware validation, the wizard
//! page controller, autosave and evidence uploads.

pub mod autosave;
pub mod catalog;
pub mod domain;
pub mod evidence;
pub mod registry;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use autosave::{
    AutosaveConfig, AutosaveCoordinator, AutosaveStatus, FormPersister, PersistError, SaveOutcome,
};
pub use domain::{
    Answer, AssessmentMode, AssessmentSubmission, DisplayCondition, FormValues, Priority,
    Question, QuestionKind, QuestionOption, Section,
};
pub use evidence::{
    format_size, EvidenceCandidate, EvidenceFile, EvidenceStore, EvidenceUploadConfig,
    EvidenceUploader, UploadError, UploadRejection, UploadReport,
};
pub use registry::{QuestionRegistry, SectionQuestions};
pub use repository::{AssessmentRepository, DraftId, DraftRecord, SubmissionId, SubmissionRecord};
pub use router::assessment_router;
pub use schema::{AssessmentSchema, ValidationErrors, MAX_TEXT_LENGTH};
pub use service::{AssessmentService, AssessmentServiceError, DraftPersister, SubmissionRequest};
pub use wizard::{AssessmentWizard, WizardError, WizardPage};
