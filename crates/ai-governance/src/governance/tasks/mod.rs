//! Per-regulation governance tasks: blueprint seeding, completion with
//! evidence, deployment-readiness summary and tracker import.

pub mod blueprint;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use blueprint::GovernanceTaskBlueprint;
pub use domain::{
    GovernanceTask, RelatedEntity, TaskError, TaskId, TaskStatus, TaskSummary, TaskTemplate,
};
pub use import::{ImportRejection, ImportReport, TaskImportError, TaskStatusImporter};
pub use repository::TaskRepository;
pub use router::task_router;
pub use service::{TaskService, TaskServiceError};
