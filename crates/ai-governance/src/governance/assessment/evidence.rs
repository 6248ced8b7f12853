use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mime::Mime;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AssessmentSettings;

/// Limits applied before a file is admitted as evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceUploadConfig {
    pub max_files: usize,
    pub max_size_bytes: u64,
    /// Empty means any type is accepted. `image/*` style wildcards match a
    /// whole top-level type.
    pub accepted_types: Vec<Mime>,
}

impl Default for EvidenceUploadConfig {
    fn default() -> Self {
        Self {
            max_files: 5,
            max_size_bytes: 10 * 1024 * 1024,
            accepted_types: vec![
                mime::APPLICATION_PDF,
                mime::IMAGE_PNG,
                mime::IMAGE_JPEG,
                mime::TEXT_PLAIN,
                mime::TEXT_CSV,
            ],
        }
    }
}

impl From<&AssessmentSettings> for EvidenceUploadConfig {
    fn from(settings: &AssessmentSettings) -> Self {
        Self {
            max_files: settings.evidence_max_files,
            max_size_bytes: settings.evidence_max_size_bytes,
            ..Self::default()
        }
    }
}

impl EvidenceUploadConfig {
    fn accepts(&self, content_type: &Mime) -> bool {
        self.accepted_types.is_empty()
            || self.accepted_types.iter().any(|accepted| {
                accepted.type_() == content_type.type_()
                    && (accepted.subtype() == mime::STAR
                        || accepted.subtype() == content_type.subtype())
            })
    }
}

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: Mime,
    pub question_id: Option<String>,
}

/// A file the uploader has admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceFile {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRejection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub admitted: Vec<EvidenceFile>,
    pub rejections: Vec<UploadRejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct UploadError(pub String);

/// Caller-supplied upload hook run before files are admitted.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    async fn upload(&self, files: &[EvidenceCandidate]) -> Result<(), UploadError>;
}

/// Managed list of evidence files for one questionnaire.
#[derive(Debug, Clone, Default)]
pub struct EvidenceUploader {
    config: EvidenceUploadConfig,
    files: Vec<EvidenceFile>,
}

impl EvidenceUploader {
    pub fn new(config: EvidenceUploadConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
        }
    }

    pub fn config(&self) -> &EvidenceUploadConfig {
        &self.config
    }

    pub fn files(&self) -> &[EvidenceFile] {
        &self.files
    }

    pub fn files_for_question<'a>(
        &'a self,
        question_id: &'a str,
    ) -> impl Iterator<Item = &'a EvidenceFile> + 'a {
        self.files
            .iter()
            .filter(move |file| file.question_id.as_deref() == Some(question_id))
    }

    pub fn remaining_slots(&self) -> usize {
        self.config.max_files.saturating_sub(self.files.len())
    }

    /// Admit files that pass the count, size and type limits. Rejections are
    /// reported per file; nothing here returns an error.
    pub async fn add_files(
        &mut self,
        candidates: Vec<EvidenceCandidate>,
        store: Option<&dyn EvidenceStore>,
    ) -> UploadReport {
        let mut report = UploadReport::default();
        if candidates.is_empty() {
            return report;
        }

        if self.files.len() + candidates.len() > self.config.max_files {
            report.rejections.push(UploadRejection {
                file_name: None,
                message: format!("Maximum {} files allowed", self.config.max_files),
            });
            return report;
        }

        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.size_bytes > self.config.max_size_bytes {
                report.rejections.push(UploadRejection {
                    message: format!(
                        "File {} exceeds the maximum size of {}",
                        candidate.name,
                        format_size(self.config.max_size_bytes)
                    ),
                    file_name: Some(candidate.name),
                });
            } else if !self.config.accepts(&candidate.content_type) {
                report.rejections.push(UploadRejection {
                    message: format!(
                        "File {} has an unsupported type {}",
                        candidate.name, candidate.content_type
                    ),
                    file_name: Some(candidate.name),
                });
            } else {
                accepted.push(candidate);
            }
        }

        if accepted.is_empty() {
            return report;
        }

        if let Some(store) = store {
            if let Err(err) = store.upload(&accepted).await {
                debug!(error = %err, files = accepted.len(), "evidence upload hook failed");
                report.rejections.push(UploadRejection {
                    file_name: None,
                    message: err.to_string(),
                });
                return report;
            }
        }

        let now = Utc::now();
        for candidate in accepted {
            let file = EvidenceFile {
                name: candidate.name,
                size_bytes: candidate.size_bytes,
                content_type: candidate.content_type.essence_str().to_string(),
                question_id: candidate.question_id,
                added_at: now,
            };
            self.files.push(file.clone());
            report.admitted.push(file);
        }

        info!(
            admitted = report.admitted.len(),
            rejected = report.rejections.len(),
            "evidence files processed"
        );
        report
    }

    pub fn remove(&mut self, index: usize) -> Option<EvidenceFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }
}

/// Human readable size using binary units, e.g. `10 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if (value.fract()).abs() < f64::EPSILON {
        format!("{} {}", value as u64, UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
