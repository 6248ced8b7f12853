use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::governance::lifecycle::LifecycleStage;
use crate::governance::regulation::Regulation;
use crate::governance::repository::RepositoryError;
use crate::governance::risk::domain::{
    AssessmentStatus, MitigationStatus, RiskAssessment, RiskAssessmentId, RiskCategory, RiskDraft,
    RiskLevel,
};
use crate::governance::risk::repository::RiskRepository;
use crate::governance::risk::service::RiskService;
use crate::governance::systems::{AiSystem, SystemDirectory, SystemId};

pub(super) fn assessment(
    id: &str,
    category: RiskCategory,
    risk_level: RiskLevel,
    status: AssessmentStatus,
    mitigation_status: MitigationStatus,
) -> RiskAssessment {
    RiskAssessment {
        id: RiskAssessmentId(id.to_string()),
        system_id: SystemId("sys-credit".to_string()),
        category,
        summary: format!("{category} finding"),
        risk_level,
        mitigation_status,
        status,
        evidence_links: Vec::new(),
        assessed_by: "analyst@example.com".to_string(),
        assessed_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        reviewed_by: None,
        reviewed_at: None,
        review_notes: None,
    }
}

pub(super) fn draft(risk_level: RiskLevel) -> RiskDraft {
    RiskDraft {
        category: RiskCategory::Bias,
        summary: "Approval rates differ across age bands".to_string(),
        risk_level,
        mitigation_status: MitigationStatus::InProgress,
        evidence_links: Vec::new(),
        assessed_by: "analyst@example.com".to_string(),
    }
}

pub(super) fn system(id: &str, stage: LifecycleStage) -> AiSystem {
    AiSystem {
        id: SystemId(id.to_string()),
        name: format!("System {id}"),
        regulation: Regulation::EuAiAct,
        lifecycle_stage: stage,
    }
}

pub(super) type TestService = RiskService<MemoryRisks, MemorySystems>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRisks>) {
    let repository = Arc::new(MemoryRisks::default());
    let systems = Arc::new(MemorySystems::with(vec![
        system("sys-credit", LifecycleStage::Deployment),
        system("sys-legacy", LifecycleStage::Retired),
    ]));
    (RiskService::new(repository.clone(), systems), repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRisks {
    records: Arc<Mutex<Vec<RiskAssessment>>>,
}

impl RiskRepository for MemoryRisks {
    fn insert(&self, assessment: RiskAssessment) -> Result<RiskAssessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(assessment.clone());
        Ok(assessment)
    }

    fn update_if(
        &self,
        expected: AssessmentStatus,
        assessment: RiskAssessment,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == assessment.id)
            .ok_or(RepositoryError::NotFound)?;
        if slot.status != expected {
            return Err(RepositoryError::Conflict);
        }
        *slot = assessment;
        Ok(())
    }

    fn fetch(&self, id: &RiskAssessmentId) -> Result<Option<RiskAssessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list_for_system(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<RiskAssessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|existing| &existing.system_id == system_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySystems {
    systems: Arc<HashMap<SystemId, AiSystem>>,
}

impl MemorySystems {
    pub(super) fn with(systems: Vec<AiSystem>) -> Self {
        Self {
            systems: Arc::new(
                systems
                    .into_iter()
                    .map(|system| (system.id.clone(), system))
                    .collect(),
            ),
        }
    }
}

impl SystemDirectory for MemorySystems {
    fn fetch_system(&self, id: &SystemId) -> Result<Option<AiSystem>, RepositoryError> {
        Ok(self.systems.get(id).cloned())
    }
}
