//! Risk findings per AI system, their review workflow and the system-level
//! risk aggregate.

pub mod aggregate;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{calculate_overall_risk_level, OverallRiskLevel};
pub use domain::{
    AssessmentStatus, MitigationStatus, ReviewDecision, RiskAssessment, RiskAssessmentId,
    RiskCategory, RiskDraft, RiskLevel,
};
pub use repository::RiskRepository;
pub use router::risk_router;
pub use service::{RiskService, RiskServiceError};
