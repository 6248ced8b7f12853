//! Applies a task tracker CSV export (`Task`, `Status`, `Evidence` columns)
//! to a system's governance tasks.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use super::domain::{release_unblocked, GovernanceTask, TaskId, TaskStatus};
use parser::TrackerRecord;

#[derive(Debug)]
pub enum TaskImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TaskImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskImportError::Io(err) => write!(f, "failed to read tracker export: {}", err),
            TaskImportError::Csv(err) => write!(f, "invalid tracker CSV data: {}", err),
        }
    }
}

impl std::error::Error for TaskImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskImportError::Io(err) => Some(err),
            TaskImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TaskImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TaskImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRejection {
    pub task: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub completed: Vec<TaskId>,
    pub released: Vec<TaskId>,
    pub unmatched: Vec<String>,
    pub rejected: Vec<ImportRejection>,
}

pub struct TaskStatusImporter;

impl TaskStatusImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        tasks: &mut [GovernanceTask],
    ) -> Result<ImportReport, TaskImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, tasks)
    }

    /// Rows are matched to tasks by title or key after normalization. Rows
    /// that name no task are reported, not fatal.
    pub fn from_reader<R: Read>(
        reader: R,
        tasks: &mut [GovernanceTask],
    ) -> Result<ImportReport, TaskImportError> {
        let mut report = ImportReport::default();

        for record in parser::parse_records(reader)? {
            let Some(index) = find_task(tasks, &record) else {
                report.unmatched.push(record.name);
                continue;
            };
            if !record.completed {
                continue;
            }

            report.released.extend(release_unblocked(tasks));
            apply_record(record, &mut tasks[index], &mut report);
        }

        report.released.extend(release_unblocked(tasks));
        Ok(report)
    }
}

fn find_task(tasks: &[GovernanceTask], record: &TrackerRecord) -> Option<usize> {
    tasks.iter().position(|task| {
        normalizer::normalize_name(&task.title) == record.normalized_name
            || task.key == record.normalized_name
    })
}

fn apply_record(record: TrackerRecord, task: &mut GovernanceTask, report: &mut ImportReport) {
    let was_open = task.status != TaskStatus::Completed;
    match task.complete(record.evidence, Utc::now()) {
        Ok(()) if was_open => report.completed.push(task.id.clone()),
        Ok(()) => {}
        Err(err) => report.rejected.push(ImportRejection {
            task: record.name,
            message: err.to_string(),
        }),
    }
}
