use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::aggregate::{calculate_overall_risk_level, OverallRiskLevel};
use super::domain::{
    AssessmentStatus, ReviewDecision, RiskAssessment, RiskAssessmentId, RiskDraft, RiskLevel,
};
use super::repository::RiskRepository;
use crate::governance::lifecycle::LifecycleStage;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::{AiSystem, SystemDirectory, SystemId};

static RISK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_risk_id() -> RiskAssessmentId {
    let id = RISK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RiskAssessmentId(format!("risk-{id:06}"))
}

/// Records risk findings and moves them through review.
pub struct RiskService<R, S> {
    repository: Arc<R>,
    systems: Arc<S>,
}

impl<R, S> RiskService<R, S>
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    pub fn new(repository: Arc<R>, systems: Arc<S>) -> Self {
        Self {
            repository,
            systems,
        }
    }

    /// Record a new finding in draft. The owning system must exist and must
    /// not be retired.
    pub fn create(
        &self,
        system_id: &SystemId,
        draft: RiskDraft,
    ) -> Result<RiskAssessment, RiskServiceError> {
        let system = self.system(system_id)?;
        if !system.lifecycle_stage.can_create_risk_assessment() {
            return Err(RiskServiceError::LifecycleLocked(system.lifecycle_stage));
        }
        check_draft(&draft)?;

        let assessment = RiskAssessment {
            id: next_risk_id(),
            system_id: system.id,
            category: draft.category,
            summary: draft.summary.trim().to_string(),
            risk_level: draft.risk_level,
            mitigation_status: draft.mitigation_status,
            status: AssessmentStatus::Draft,
            evidence_links: draft.evidence_links,
            assessed_by: draft.assessed_by,
            assessed_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        };

        let stored = self.repository.insert(assessment)?;
        info!(
            risk = %stored.id.0,
            system = %stored.system_id.0,
            level = %stored.risk_level,
            "risk assessment created"
        );
        Ok(stored)
    }

    /// Replace the editable fields of a draft or rejected assessment.
    pub fn update(
        &self,
        id: &RiskAssessmentId,
        draft: RiskDraft,
    ) -> Result<RiskAssessment, RiskServiceError> {
        let mut assessment = self.get(id)?;
        let previous = assessment.status;
        if !previous.is_editable() {
            return Err(RiskServiceError::InvalidTransition {
                from: assessment.status,
                action: "update",
            });
        }
        check_draft(&draft)?;

        assessment.category = draft.category;
        assessment.summary = draft.summary.trim().to_string();
        assessment.risk_level = draft.risk_level;
        assessment.mitigation_status = draft.mitigation_status;
        assessment.evidence_links = draft.evidence_links;
        assessment.assessed_by = draft.assessed_by;
        assessment.assessed_at = Utc::now();

        self.store(previous, &assessment, "update")?;
        Ok(assessment)
    }

    /// Send a draft for review. High risk findings need evidence first.
    pub fn submit(&self, id: &RiskAssessmentId) -> Result<RiskAssessment, RiskServiceError> {
        let mut assessment = self.get(id)?;
        if assessment.status != AssessmentStatus::Draft {
            return Err(RiskServiceError::InvalidTransition {
                from: assessment.status,
                action: "submit",
            });
        }
        if assessment.risk_level == RiskLevel::High && assessment.evidence_links.is_empty() {
            return Err(RiskServiceError::EvidenceRequired);
        }

        assessment.status = AssessmentStatus::Submitted;
        self.store(AssessmentStatus::Draft, &assessment, "submit")?;
        info!(risk = %assessment.id.0, "risk assessment submitted");
        Ok(assessment)
    }

    pub fn approve(
        &self,
        id: &RiskAssessmentId,
        decision: ReviewDecision,
    ) -> Result<RiskAssessment, RiskServiceError> {
        self.review(id, decision, AssessmentStatus::Approved, "approve")
    }

    pub fn reject(
        &self,
        id: &RiskAssessmentId,
        decision: ReviewDecision,
    ) -> Result<RiskAssessment, RiskServiceError> {
        self.review(id, decision, AssessmentStatus::Rejected, "reject")
    }

    /// Return a rejected assessment to draft so it can be reworked.
    pub fn reopen(&self, id: &RiskAssessmentId) -> Result<RiskAssessment, RiskServiceError> {
        let mut assessment = self.get(id)?;
        if assessment.status != AssessmentStatus::Rejected {
            return Err(RiskServiceError::InvalidTransition {
                from: assessment.status,
                action: "reopen",
            });
        }

        assessment.status = AssessmentStatus::Draft;
        self.store(AssessmentStatus::Rejected, &assessment, "reopen")?;
        Ok(assessment)
    }

    pub fn get(&self, id: &RiskAssessmentId) -> Result<RiskAssessment, RiskServiceError> {
        let assessment = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(assessment)
    }

    pub fn list(&self, system_id: &SystemId) -> Result<Vec<RiskAssessment>, RiskServiceError> {
        self.system(system_id)?;
        Ok(self.repository.list_for_system(system_id)?)
    }

    pub fn overall_risk(&self, system_id: &SystemId) -> Result<OverallRiskLevel, RiskServiceError> {
        let assessments = self.list(system_id)?;
        Ok(calculate_overall_risk_level(&assessments))
    }

    fn system(&self, system_id: &SystemId) -> Result<AiSystem, RiskServiceError> {
        self.systems
            .fetch_system(system_id)?
            .ok_or_else(|| RiskServiceError::UnknownSystem(system_id.clone()))
    }

    /// Write a transition made from `expected`. When another reviewer moved
    /// the record first, report the transition against its current status.
    fn store(
        &self,
        expected: AssessmentStatus,
        assessment: &RiskAssessment,
        action: &'static str,
    ) -> Result<(), RiskServiceError> {
        match self.repository.update_if(expected, assessment.clone()) {
            Err(RepositoryError::Conflict) => {
                let current = self.get(&assessment.id)?;
                Err(RiskServiceError::InvalidTransition {
                    from: current.status,
                    action,
                })
            }
            other => Ok(other?),
        }
    }

    fn review(
        &self,
        id: &RiskAssessmentId,
        decision: ReviewDecision,
        outcome: AssessmentStatus,
        action: &'static str,
    ) -> Result<RiskAssessment, RiskServiceError> {
        let mut assessment = self.get(id)?;
        if assessment.status != AssessmentStatus::Submitted {
            return Err(RiskServiceError::InvalidTransition {
                from: assessment.status,
                action,
            });
        }
        let reviewer = decision.reviewer.trim();
        if reviewer.is_empty() {
            return Err(RiskServiceError::InvalidDraft(
                "a reviewer is required".to_string(),
            ));
        }

        assessment.status = outcome;
        assessment.reviewed_by = Some(reviewer.to_string());
        assessment.reviewed_at = Some(Utc::now());
        assessment.review_notes = decision.notes.filter(|notes| !notes.trim().is_empty());

        self.store(AssessmentStatus::Submitted, &assessment, action)?;
        info!(
            risk = %assessment.id.0,
            status = %assessment.status,
            reviewer = %reviewer,
            "risk assessment reviewed"
        );
        Ok(assessment)
    }
}

fn check_draft(draft: &RiskDraft) -> Result<(), RiskServiceError> {
    if draft.summary.trim().is_empty() {
        return Err(RiskServiceError::InvalidDraft(
            "a summary is required".to_string(),
        ));
    }
    if draft.assessed_by.trim().is_empty() {
        return Err(RiskServiceError::InvalidDraft(
            "an assessor is required".to_string(),
        ));
    }
    Ok(())
}

/// Error raised by the risk service.
#[derive(Debug, thiserror::Error)]
pub enum RiskServiceError {
    #[error("system '{0}' is not registered")]
    UnknownSystem(SystemId),
    #[error("risk assessments cannot be created for systems in the {0} stage")]
    LifecycleLocked(LifecycleStage),
    #[error("cannot {action} a risk assessment that is {from}")]
    InvalidTransition {
        from: AssessmentStatus,
        action: &'static str,
    },
    #[error("high risk assessments need at least one evidence link before submission")]
    EvidenceRequired,
    #[error("{0}")]
    InvalidDraft(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
