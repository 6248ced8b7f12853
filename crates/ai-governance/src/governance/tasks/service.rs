use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::blueprint::GovernanceTaskBlueprint;
use super::domain::{
    release_unblocked, GovernanceTask, RelatedEntity, TaskError, TaskId, TaskStatus, TaskSummary,
};
use super::import::{ImportReport, TaskImportError, TaskStatusImporter};
use super::repository::TaskRepository;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::{AiSystem, SystemDirectory, SystemId};

static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    let id = TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TaskId(format!("task-{id:06}"))
}

/// Seeds, lists and completes governance tasks.
pub struct TaskService<R, S> {
    repository: Arc<R>,
    systems: Arc<S>,
}

impl<R, S> TaskService<R, S>
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    pub fn new(repository: Arc<R>, systems: Arc<S>) -> Self {
        Self {
            repository,
            systems,
        }
    }

    /// Create the regulation's blueprint tasks for a system. Seeding a system
    /// that already has tasks returns them unchanged.
    pub fn seed(&self, system_id: &SystemId) -> Result<Vec<GovernanceTask>, TaskServiceError> {
        let system = self.system(system_id)?;
        let existing = self.repository.list_for_system(&system.id)?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let blueprint = GovernanceTaskBlueprint::for_regulation(system.regulation);
        let tasks: Vec<GovernanceTask> = blueprint
            .task_templates()
            .iter()
            .map(|template| GovernanceTask {
                id: next_task_id(),
                system_id: system.id.clone(),
                key: template.key.to_string(),
                title: template.title.to_string(),
                description: template.description.to_string(),
                regulation: system.regulation,
                status: if template.depends_on.is_some() {
                    TaskStatus::Blocked
                } else {
                    TaskStatus::Pending
                },
                blocking: template.blocking,
                depends_on: template.depends_on.map(str::to_string),
                evidence_link: None,
                related_entity: template.related_kind.map(|kind| RelatedEntity {
                    kind: kind.to_string(),
                    id: system.regulation.slug().to_string(),
                }),
                completed_at: None,
            })
            .collect();

        let stored = match self.repository.insert_seed(&system.id, tasks) {
            Err(RepositoryError::Conflict) => {
                debug!(system = %system.id, "governance tasks seeded concurrently");
                return Ok(self.repository.list_for_system(&system.id)?);
            }
            other => other?,
        };
        info!(
            system = %system.id,
            regulation = system.regulation.slug(),
            tasks = stored.len(),
            "governance tasks seeded"
        );
        Ok(stored)
    }

    pub fn list(&self, system_id: &SystemId) -> Result<Vec<GovernanceTask>, TaskServiceError> {
        self.system(system_id)?;
        Ok(self.repository.list_for_system(system_id)?)
    }

    pub fn get(&self, id: &TaskId) -> Result<GovernanceTask, TaskServiceError> {
        let task = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(task)
    }

    /// Complete a task, optionally attaching an evidence link, and release
    /// any task that was waiting on it.
    pub fn complete(
        &self,
        id: &TaskId,
        evidence_link: Option<String>,
    ) -> Result<GovernanceTask, TaskServiceError> {
        let task = self.get(id)?;
        let mut tasks = self.repository.list_for_system(&task.system_id)?;
        let index = tasks
            .iter()
            .position(|candidate| candidate.id == task.id)
            .ok_or(RepositoryError::NotFound)?;

        tasks[index].complete(evidence_link, Utc::now())?;
        self.repository.update(tasks[index].clone())?;

        for released in release_unblocked(&mut tasks) {
            if let Some(task) = tasks.iter().find(|task| task.id == released) {
                self.repository.update(task.clone())?;
            }
        }

        info!(task = %tasks[index].id, key = %tasks[index].key, "governance task completed");
        Ok(tasks[index].clone())
    }

    pub fn summary(&self, system_id: &SystemId) -> Result<TaskSummary, TaskServiceError> {
        let tasks = self.list(system_id)?;
        Ok(TaskSummary::from_tasks(&tasks))
    }

    /// Apply a tracker export to a system's tasks and store whatever changed.
    pub fn import_status<Rd: Read>(
        &self,
        system_id: &SystemId,
        reader: Rd,
    ) -> Result<ImportReport, TaskServiceError> {
        let before = self.list(system_id)?;
        let mut tasks = before.clone();
        let report = TaskStatusImporter::from_reader(reader, &mut tasks)?;

        for (old, new) in before.iter().zip(&tasks) {
            if old != new {
                self.repository.update(new.clone())?;
            }
        }
        if !report.unmatched.is_empty() {
            warn!(
                system = %system_id,
                unmatched = report.unmatched.len(),
                "tracker rows did not match any governance task"
            );
        }
        Ok(report)
    }

    fn system(&self, system_id: &SystemId) -> Result<AiSystem, TaskServiceError> {
        self.systems
            .fetch_system(system_id)?
            .ok_or_else(|| TaskServiceError::UnknownSystem(system_id.clone()))
    }
}

/// Error raised by the task service.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    #[error("system '{0}' is not registered")]
    UnknownSystem(SystemId),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Import(#[from] TaskImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
