use serde::Serialize;

use super::domain::{AssessmentStatus, MitigationStatus, RiskAssessment, RiskCategory, RiskLevel};

/// System-level risk derived from approved assessments. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallRiskLevel {
    pub level: RiskLevel,
    pub highest_category: Option<RiskCategory>,
    pub assessment_count: usize,
    pub mitigated_count: usize,
}

impl Default for OverallRiskLevel {
    fn default() -> Self {
        Self {
            level: RiskLevel::Low,
            highest_category: None,
            assessment_count: 0,
            mitigated_count: 0,
        }
    }
}

/// Highest risk level among approved assessments. Draft, submitted and
/// rejected assessments are ignored. On equal levels the earliest assessment
/// in the slice supplies the category.
pub fn calculate_overall_risk_level(assessments: &[RiskAssessment]) -> OverallRiskLevel {
    let mut overall = OverallRiskLevel::default();
    let mut highest: Option<&RiskAssessment> = None;

    for assessment in assessments
        .iter()
        .filter(|assessment| assessment.status == AssessmentStatus::Approved)
    {
        overall.assessment_count += 1;
        if assessment.mitigation_status == MitigationStatus::Mitigated {
            overall.mitigated_count += 1;
        }
        let replaces = highest
            .map_or(true, |current| assessment.risk_level.rank() > current.risk_level.rank());
        if replaces {
            highest = Some(assessment);
        }
    }

    if let Some(assessment) = highest {
        overall.level = assessment.risk_level;
        overall.highest_category = Some(assessment.category);
    }
    overall
}
