use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::governance::regulation::Regulation;
use crate::governance::systems::SystemId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record a task points at, e.g. the questionnaire it is satisfied by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub kind: String,
    pub id: String,
}

/// Static definition a governance task is seeded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Open blocking tasks keep a system from being deployment ready.
    pub blocking: bool,
    pub depends_on: Option<&'static str>,
    pub related_kind: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceTask {
    pub id: TaskId,
    pub system_id: SystemId,
    pub key: String,
    pub title: String,
    pub description: String,
    pub regulation: Regulation,
    pub status: TaskStatus,
    pub blocking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<RelatedEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl GovernanceTask {
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Completed
    }

    /// Mark the task done. Completing again only replaces the evidence link.
    pub fn complete(
        &mut self,
        evidence_link: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        if self.status == TaskStatus::Blocked {
            return Err(TaskError::Blocked {
                task: self.id.clone(),
                waiting_on: self.depends_on.clone().unwrap_or_default(),
            });
        }

        let evidence_link = evidence_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());
        if let Some(link) = &evidence_link {
            check_evidence_link(link)?;
        }

        if self.status != TaskStatus::Completed {
            self.status = TaskStatus::Completed;
            self.completed_at = Some(at);
        }
        if evidence_link.is_some() {
            self.evidence_link = evidence_link;
        }
        Ok(())
    }
}

/// Move blocked tasks to pending once the task they wait on is completed.
/// Returns the ids of the tasks that were released.
pub fn release_unblocked(tasks: &mut [GovernanceTask]) -> Vec<TaskId> {
    let completed: Vec<String> = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .map(|task| task.key.clone())
        .collect();

    let mut released = Vec::new();
    for task in tasks.iter_mut() {
        if task.status != TaskStatus::Blocked {
            continue;
        }
        let ready = task
            .depends_on
            .as_ref()
            .map_or(true, |key| completed.contains(key));
        if ready {
            task.status = TaskStatus::Pending;
            released.push(task.id.clone());
        }
    }
    released
}

fn check_evidence_link(link: &str) -> Result<(), TaskError> {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    let has_host = rest.is_some_and(|rest| {
        !rest.is_empty() && !rest.starts_with('/') && !rest.contains(char::is_whitespace)
    });
    if has_host {
        Ok(())
    } else {
        Err(TaskError::InvalidEvidenceLink(link.to_string()))
    }
}

/// Progress of one system's governance tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub blocked: usize,
    pub open_blockers: usize,
    pub deployment_ready: bool,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[GovernanceTask]) -> Self {
        let mut summary = Self::default();
        for task in tasks {
            summary.total += 1;
            match task.status {
                TaskStatus::Completed => summary.completed += 1,
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Blocked => summary.blocked += 1,
            }
            if task.blocking && task.is_open() {
                summary.open_blockers += 1;
            }
        }
        summary.deployment_ready = summary.open_blockers == 0;
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task {task} is blocked until '{waiting_on}' is completed")]
    Blocked { task: TaskId, waiting_on: String },
    #[error("evidence link '{0}' must be an http(s) URL")]
    InvalidEvidenceLink(String),
}
