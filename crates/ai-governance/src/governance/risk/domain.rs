use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::governance::systems::SystemId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiskAssessmentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Bias,
    Robustness,
    Privacy,
    Explainability,
}

impl RiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bias => "bias",
            Self::Robustness => "robustness",
            Self::Privacy => "privacy",
            Self::Explainability => "explainability",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a finding. Unknown strings fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed ordering used by the aggregator: low 1, medium 2, high 3.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStatus {
    #[default]
    NotStarted,
    InProgress,
    Mitigated,
}

/// Review state of a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded risk finding for one AI system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: RiskAssessmentId,
    pub system_id: SystemId,
    pub category: RiskCategory,
    pub summary: String,
    pub risk_level: RiskLevel,
    pub mitigation_status: MitigationStatus,
    pub status: AssessmentStatus,
    #[serde(default)]
    pub evidence_links: Vec<String>,
    pub assessed_by: String,
    pub assessed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

/// Editable fields of a risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDraft {
    pub category: RiskCategory,
    pub summary: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub mitigation_status: MitigationStatus,
    #[serde(default)]
    pub evidence_links: Vec<String>,
    pub assessed_by: String,
}

/// Reviewer decision payload for approve and reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub reviewer: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_rank_low_to_high() {
        assert!(RiskLevel::Low.rank() < RiskLevel::Medium.rank());
        assert!(RiskLevel::Medium.rank() < RiskLevel::High.rank());
    }

    #[test]
    fn unknown_levels_do_not_deserialize() {
        assert_eq!(
            serde_json::from_str::<RiskLevel>("\"medium\"").expect("known level"),
            RiskLevel::Medium
        );
        assert!(serde_json::from_str::<RiskLevel>("\"critical\"").is_err());
    }

    #[test]
    fn only_draft_and_rejected_are_editable() {
        assert!(AssessmentStatus::Draft.is_editable());
        assert!(AssessmentStatus::Rejected.is_editable());
        assert!(!AssessmentStatus::Submitted.is_editable());
        assert!(!AssessmentStatus::Approved.is_editable());
    }
}
