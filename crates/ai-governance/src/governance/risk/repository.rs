use super::domain::{AssessmentStatus, RiskAssessment, RiskAssessmentId};
use crate::governance::repository::RepositoryError;
use crate::governance::systems::SystemId;

/// Storage abstraction for risk assessments.
pub trait RiskRepository: Send + Sync {
    fn insert(&self, assessment: RiskAssessment) -> Result<RiskAssessment, RepositoryError>;
    /// Replace a stored assessment only while its status is still
    /// `expected`. A concurrent transition yields `RepositoryError::Conflict`.
    fn update_if(
        &self,
        expected: AssessmentStatus,
        assessment: RiskAssessment,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RiskAssessmentId) -> Result<Option<RiskAssessment>, RepositoryError>;
    /// All assessments for a system in creation order.
    fn list_for_system(&self, system_id: &SystemId)
        -> Result<Vec<RiskAssessment>, RepositoryError>;
}
