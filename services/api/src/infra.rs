use ai_governance::governance::assessment::{
    AssessmentRepository, AssessmentService, DraftId, DraftRecord, EvidenceCandidate,
    EvidenceStore, SubmissionId, SubmissionRecord, UploadError,
};
use ai_governance::governance::risk::{
    AssessmentStatus, RiskAssessment, RiskAssessmentId, RiskRepository, RiskService,
};
use ai_governance::governance::tasks::{GovernanceTask, TaskId, TaskRepository, TaskService};
use ai_governance::governance::{
    AiSystem, LifecycleStage, Regulation, RepositoryError, SystemDirectory, SystemId,
};
use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    drafts: Arc<Mutex<HashMap<DraftId, DraftRecord>>>,
    submissions: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn save_draft(&self, draft: DraftRecord) -> Result<DraftRecord, RepositoryError> {
        lock(&self.drafts)?.insert(draft.draft_id.clone(), draft.clone());
        Ok(draft)
    }

    fn fetch_draft(&self, id: &DraftId) -> Result<Option<DraftRecord>, RepositoryError> {
        Ok(lock(&self.drafts)?.get(id).cloned())
    }

    fn insert_submission(
        &self,
        record: SubmissionRecord,
    ) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = lock(&self.submissions)?;
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
        Ok(lock(&self.submissions)?.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRiskRepository {
    records: Arc<Mutex<HashMap<RiskAssessmentId, RiskAssessment>>>,
}

impl RiskRepository for InMemoryRiskRepository {
    fn insert(&self, assessment: RiskAssessment) -> Result<RiskAssessment, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update_if(
        &self,
        expected: AssessmentStatus,
        assessment: RiskAssessment,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&assessment.id) {
            Some(existing) if existing.status != expected => Err(RepositoryError::Conflict),
            Some(existing) => {
                *existing = assessment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &RiskAssessmentId) -> Result<Option<RiskAssessment>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn list_for_system(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<RiskAssessment>, RepositoryError> {
        let mut assessments: Vec<RiskAssessment> = lock(&self.records)?
            .values()
            .filter(|assessment| &assessment.system_id == system_id)
            .cloned()
            .collect();
        assessments.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(assessments)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTaskRepository {
    records: Arc<Mutex<HashMap<TaskId, GovernanceTask>>>,
}

impl TaskRepository for InMemoryTaskRepository {
    fn insert_seed(
        &self,
        system_id: &SystemId,
        tasks: Vec<GovernanceTask>,
    ) -> Result<Vec<GovernanceTask>, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let seeded = guard.values().any(|task| &task.system_id == system_id);
        if seeded || tasks.iter().any(|task| guard.contains_key(&task.id)) {
            return Err(RepositoryError::Conflict);
        }
        guard.extend(tasks.iter().map(|task| (task.id.clone(), task.clone())));
        Ok(tasks)
    }

    fn update(&self, task: GovernanceTask) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&task.id) {
            Some(existing) => {
                *existing = task;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &TaskId) -> Result<Option<GovernanceTask>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn list_for_system(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<GovernanceTask>, RepositoryError> {
        let mut tasks: Vec<GovernanceTask> = lock(&self.records)?
            .values()
            .filter(|task| &task.system_id == system_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tasks)
    }
}

/// Registered systems keyed by id. Read-only once built.
#[derive(Default, Clone)]
pub(crate) struct InMemorySystemDirectory {
    systems: Arc<HashMap<SystemId, AiSystem>>,
}

impl InMemorySystemDirectory {
    pub(crate) fn new(systems: Vec<AiSystem>) -> Self {
        Self {
            systems: Arc::new(
                systems
                    .into_iter()
                    .map(|system| (system.id.clone(), system))
                    .collect(),
            ),
        }
    }

    pub(crate) fn all(&self) -> Vec<AiSystem> {
        let mut systems: Vec<AiSystem> = self.systems.values().cloned().collect();
        systems.sort_by(|a, b| a.id.cmp(&b.id));
        systems
    }
}

impl SystemDirectory for InMemorySystemDirectory {
    fn fetch_system(&self, id: &SystemId) -> Result<Option<AiSystem>, RepositoryError> {
        Ok(self.systems.get(id).cloned())
    }
}

/// Upload hook that records file names instead of sending them anywhere.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvidenceStore {
    uploaded: Arc<Mutex<Vec<String>>>,
}

impl InMemoryEvidenceStore {
    pub(crate) fn uploaded(&self) -> Vec<String> {
        self.uploaded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn upload(&self, files: &[EvidenceCandidate]) -> Result<(), UploadError> {
        let mut guard = self
            .uploaded
            .lock()
            .map_err(|_| UploadError("evidence store unavailable".to_string()))?;
        guard.extend(files.iter().map(|file| file.name.clone()));
        Ok(())
    }
}

fn system(id: &str, name: &str, regulation: Regulation, stage: LifecycleStage) -> AiSystem {
    AiSystem {
        id: SystemId(id.to_string()),
        name: name.to_string(),
        regulation,
        lifecycle_stage: stage,
    }
}

/// Systems available to the HTTP service and the CLI demo.
pub(crate) fn demo_systems() -> Vec<AiSystem> {
    vec![
        system(
            "sys-credit-scoring",
            "Retail credit scoring",
            Regulation::EuAiAct,
            LifecycleStage::Deployment,
        ),
        system(
            "sys-support-chatbot",
            "Customer support assistant",
            Regulation::UkAiFramework,
            LifecycleStage::Testing,
        ),
        system(
            "sys-fraud-detection",
            "Card fraud detection",
            Regulation::Mas,
            LifecycleStage::Monitoring,
        ),
        system(
            "sys-cv-screening",
            "Legacy CV screening",
            Regulation::EuAiAct,
            LifecycleStage::Retired,
        ),
    ]
}

pub(crate) type Assessments = AssessmentService<InMemoryAssessmentRepository>;
pub(crate) type Risks = RiskService<InMemoryRiskRepository, InMemorySystemDirectory>;
pub(crate) type Tasks = TaskService<InMemoryTaskRepository, InMemorySystemDirectory>;

/// The three governance services wired to in-memory storage.
#[derive(Clone)]
pub(crate) struct GovernanceServices {
    pub(crate) systems: InMemorySystemDirectory,
    pub(crate) assessments: Arc<Assessments>,
    pub(crate) risks: Arc<Risks>,
    pub(crate) tasks: Arc<Tasks>,
}

impl GovernanceServices {
    pub(crate) fn in_memory(systems: Vec<AiSystem>) -> Self {
        let directory = InMemorySystemDirectory::new(systems);
        let shared_directory = Arc::new(directory.clone());
        Self {
            assessments: Arc::new(AssessmentService::new(Arc::new(
                InMemoryAssessmentRepository::default(),
            ))),
            risks: Arc::new(RiskService::new(
                Arc::new(InMemoryRiskRepository::default()),
                shared_directory.clone(),
            )),
            tasks: Arc::new(TaskService::new(
                Arc::new(InMemoryTaskRepository::default()),
                shared_directory,
            )),
            systems: directory,
        }
    }
}
