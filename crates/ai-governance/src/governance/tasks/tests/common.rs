use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::governance::lifecycle::LifecycleStage;
use crate::governance::regulation::Regulation;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::{AiSystem, SystemDirectory, SystemId};
use crate::governance::tasks::domain::{GovernanceTask, TaskId};
use crate::governance::tasks::repository::TaskRepository;
use crate::governance::tasks::service::TaskService;

pub(super) type TestService = TaskService<MemoryTasks, MemorySystems>;

pub(super) fn uk_system() -> SystemId {
    SystemId("sys-chatbot".to_string())
}

pub(super) fn uk_systems() -> MemorySystems {
    MemorySystems(Arc::new(HashMap::from([(
        uk_system(),
        AiSystem {
            id: uk_system(),
            name: "Support chatbot".to_string(),
            regulation: Regulation::UkAiFramework,
            lifecycle_stage: LifecycleStage::Testing,
        },
    )])))
}

pub(super) fn build_service() -> (TestService, Arc<MemoryTasks>) {
    let repository = Arc::new(MemoryTasks::default());
    (
        TaskService::new(repository.clone(), Arc::new(uk_systems())),
        repository,
    )
}

pub(super) fn task_by_key<'a>(tasks: &'a [GovernanceTask], key: &str) -> &'a GovernanceTask {
    tasks
        .iter()
        .find(|task| task.key == key)
        .unwrap_or_else(|| panic!("task {key} seeded"))
}

#[derive(Default, Clone)]
pub(super) struct MemoryTasks {
    records: Arc<Mutex<Vec<GovernanceTask>>>,
}

impl TaskRepository for MemoryTasks {
    fn insert_seed(
        &self,
        system_id: &SystemId,
        tasks: Vec<GovernanceTask>,
    ) -> Result<Vec<GovernanceTask>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| &existing.system_id == system_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.extend(tasks.iter().cloned());
        Ok(tasks)
    }

    fn update(&self, task: GovernanceTask) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = task;
        Ok(())
    }

    fn fetch(&self, id: &TaskId) -> Result<Option<GovernanceTask>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list_for_system(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<GovernanceTask>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|existing| &existing.system_id == system_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySystems(Arc<HashMap<SystemId, AiSystem>>);

impl SystemDirectory for MemorySystems {
    fn fetch_system(&self, id: &SystemId) -> Result<Option<AiSystem>, RepositoryError> {
        Ok(self.0.get(id).cloned())
    }
}
