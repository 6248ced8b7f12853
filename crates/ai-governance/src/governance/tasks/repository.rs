use super::domain::{GovernanceTask, TaskId};
use crate::governance::repository::RepositoryError;
use crate::governance::systems::SystemId;

/// Storage abstraction for governance tasks.
pub trait TaskRepository: Send + Sync {
    /// Store a system's seeded tasks in one step, only while the system has
    /// none. A system that already has tasks yields `RepositoryError::Conflict`.
    fn insert_seed(
        &self,
        system_id: &SystemId,
        tasks: Vec<GovernanceTask>,
    ) -> Result<Vec<GovernanceTask>, RepositoryError>;
    fn update(&self, task: GovernanceTask) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TaskId) -> Result<Option<GovernanceTask>, RepositoryError>;
    /// Tasks of one system in seeding order.
    fn list_for_system(&self, system_id: &SystemId)
        -> Result<Vec<GovernanceTask>, RepositoryError>;
}
