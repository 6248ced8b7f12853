use std::sync::{Arc, Mutex};

use super::common::*;
use crate::governance::lifecycle::LifecycleStage;
use crate::governance::repository::RepositoryError;
use crate::governance::risk::domain::{
    AssessmentStatus, MitigationStatus, ReviewDecision, RiskAssessment, RiskAssessmentId,
    RiskCategory, RiskLevel,
};
use crate::governance::risk::repository::RiskRepository;
use crate::governance::risk::service::{RiskService, RiskServiceError};
use crate::governance::systems::SystemId;

fn credit() -> SystemId {
    SystemId("sys-credit".to_string())
}

fn reviewer(notes: Option<&str>) -> ReviewDecision {
    ReviewDecision {
        reviewer: "governance-lead@example.com".to_string(),
        notes: notes.map(str::to_string),
    }
}

#[test]
fn create_starts_in_draft() {
    let (service, _) = build_service();

    let created = service
        .create(&credit(), draft(RiskLevel::Medium))
        .expect("deployment systems accept assessments");

    assert_eq!(created.status, AssessmentStatus::Draft);
    assert!(created.id.0.starts_with("risk-"));
    assert_eq!(created.system_id, credit());
    assert!(created.reviewed_by.is_none());
}

#[test]
fn retired_systems_reject_new_assessments() {
    let (service, repository) = build_service();

    match service.create(&SystemId("sys-legacy".to_string()), draft(RiskLevel::Low)) {
        Err(RiskServiceError::LifecycleLocked(LifecycleStage::Retired)) => {}
        other => panic!("expected lifecycle lock, got {other:?}"),
    }
    assert!(repository
        .list_for_system(&SystemId("sys-legacy".to_string()))
        .map(|records| records.is_empty())
        .unwrap_or(false));
}

#[test]
fn unknown_systems_are_reported() {
    let (service, _) = build_service();
    match service.create(&SystemId("sys-ghost".to_string()), draft(RiskLevel::Low)) {
        Err(RiskServiceError::UnknownSystem(id)) => assert_eq!(id.0, "sys-ghost"),
        other => panic!("expected unknown system, got {other:?}"),
    }
}

#[test]
fn blank_summary_is_rejected() {
    let (service, _) = build_service();
    let mut blank = draft(RiskLevel::Low);
    blank.summary = "  ".to_string();
    assert!(matches!(
        service.create(&credit(), blank),
        Err(RiskServiceError::InvalidDraft(_))
    ));
}

#[test]
fn high_risk_needs_evidence_before_submission() {
    let (service, _) = build_service();
    let created = service
        .create(&credit(), draft(RiskLevel::High))
        .expect("created");

    assert!(matches!(
        service.submit(&created.id),
        Err(RiskServiceError::EvidenceRequired)
    ));

    let mut with_evidence = draft(RiskLevel::High);
    with_evidence.evidence_links = vec!["https://docs.example.com/fairness-report".to_string()];
    service
        .update(&created.id, with_evidence)
        .expect("drafts are editable");

    let submitted = service.submit(&created.id).expect("evidence attached");
    assert_eq!(submitted.status, AssessmentStatus::Submitted);
}

#[test]
fn review_records_the_reviewer() {
    let (service, _) = build_service();
    let created = service
        .create(&credit(), draft(RiskLevel::Medium))
        .expect("created");
    service.submit(&created.id).expect("submitted");

    let approved = service
        .approve(&created.id, reviewer(Some("Mitigation plan accepted")))
        .expect("approved");

    assert_eq!(approved.status, AssessmentStatus::Approved);
    assert_eq!(
        approved.reviewed_by.as_deref(),
        Some("governance-lead@example.com")
    );
    assert!(approved.reviewed_at.is_some());
    assert_eq!(
        approved.review_notes.as_deref(),
        Some("Mitigation plan accepted")
    );
}

#[test]
fn illegal_transitions_are_refused() {
    let (service, _) = build_service();
    let created = service
        .create(&credit(), draft(RiskLevel::Low))
        .expect("created");

    match service.approve(&created.id, reviewer(None)) {
        Err(RiskServiceError::InvalidTransition { from, action }) => {
            assert_eq!(from, AssessmentStatus::Draft);
            assert_eq!(action, "approve");
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
    assert!(matches!(
        service.reopen(&created.id),
        Err(RiskServiceError::InvalidTransition { .. })
    ));

    service.submit(&created.id).expect("submitted");
    assert!(matches!(
        service.submit(&created.id),
        Err(RiskServiceError::InvalidTransition { .. })
    ));
    assert!(matches!(
        service.update(&created.id, draft(RiskLevel::Medium)),
        Err(RiskServiceError::InvalidTransition { .. })
    ));
}

#[test]
fn rejected_assessments_can_be_reworked() {
    let (service, _) = build_service();
    let created = service
        .create(&credit(), draft(RiskLevel::Low))
        .expect("created");
    service.submit(&created.id).expect("submitted");
    service
        .reject(&created.id, reviewer(Some("Summary too vague")))
        .expect("rejected");

    let reopened = service.reopen(&created.id).expect("reopened");
    assert_eq!(reopened.status, AssessmentStatus::Draft);
    service.submit(&created.id).expect("resubmitted");
}

#[test]
fn overall_risk_follows_approvals() {
    let (service, _) = build_service();
    let high = {
        let mut high = draft(RiskLevel::High);
        high.evidence_links = vec!["https://docs.example.com/red-team".to_string()];
        high.mitigation_status = MitigationStatus::Mitigated;
        service.create(&credit(), high).expect("created")
    };
    let medium = service
        .create(&credit(), draft(RiskLevel::Medium))
        .expect("created");

    for id in [&high.id, &medium.id] {
        service.submit(id).expect("submitted");
    }
    service
        .approve(&medium.id, reviewer(None))
        .expect("approved");

    let overall = service.overall_risk(&credit()).expect("aggregated");
    assert_eq!(overall.level, RiskLevel::Medium);
    assert_eq!(overall.assessment_count, 1);

    service.approve(&high.id, reviewer(None)).expect("approved");
    let overall = service.overall_risk(&credit()).expect("aggregated");
    assert_eq!(overall.level, RiskLevel::High);
    assert_eq!(overall.assessment_count, 2);
    assert_eq!(overall.mitigated_count, 1);
}

#[test]
fn missing_assessments_are_not_found() {
    let (service, _) = build_service();
    match service.get(&RiskAssessmentId("risk-missing".to_string())) {
        Err(RiskServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

/// Hands out one outdated copy of a record, as a reviewer who loaded the
/// page before someone else decided would see it.
struct StaleFirstRead {
    inner: MemoryRisks,
    stale: Mutex<Option<RiskAssessment>>,
}

impl RiskRepository for StaleFirstRead {
    fn insert(
        &self,
        assessment: RiskAssessment,
    ) -> Result<RiskAssessment, RepositoryError> {
        self.inner.insert(assessment)
    }

    fn update_if(
        &self,
        expected: AssessmentStatus,
        assessment: RiskAssessment,
    ) -> Result<(), RepositoryError> {
        self.inner.update_if(expected, assessment)
    }

    fn fetch(
        &self,
        id: &RiskAssessmentId,
    ) -> Result<Option<RiskAssessment>, RepositoryError> {
        let stale = self.stale.lock().expect("stale mutex poisoned").take();
        match stale {
            Some(record) => Ok(Some(record)),
            None => self.inner.fetch(id),
        }
    }

    fn list_for_system(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<RiskAssessment>, RepositoryError> {
        self.inner.list_for_system(system_id)
    }
}

#[test]
fn losing_reviewer_cannot_overwrite_a_decision() {
    let inner = MemoryRisks::default();
    let approved = assessment(
        "risk-contested",
        RiskCategory::Bias,
        RiskLevel::High,
        AssessmentStatus::Approved,
        MitigationStatus::Mitigated,
    );
    inner.insert(approved.clone()).expect("seeded");
    let mut stale = approved.clone();
    stale.status = AssessmentStatus::Submitted;

    let service = RiskService::new(
        Arc::new(StaleFirstRead {
            inner: inner.clone(),
            stale: Mutex::new(Some(stale)),
        }),
        Arc::new(MemorySystems::with(vec![system(
            "sys-credit",
            LifecycleStage::Deployment,
        )])),
    );

    match service.reject(&approved.id, reviewer(Some("Too late"))) {
        Err(RiskServiceError::InvalidTransition { from, action }) => {
            assert_eq!(from, AssessmentStatus::Approved);
            assert_eq!(action, "reject");
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
    let stored = inner
        .fetch(&approved.id)
        .expect("fetch")
        .expect("still stored");
    assert_eq!(stored.status, AssessmentStatus::Approved);
    assert!(stored.review_notes.is_none());
}

#[test]
fn conditional_update_refuses_a_changed_status() {
    let (_, repository) = build_service();
    let record = assessment(
        "risk-guarded",
        RiskCategory::Privacy,
        RiskLevel::Low,
        AssessmentStatus::Draft,
        MitigationStatus::NotStarted,
    );
    repository.insert(record.clone()).expect("seeded");

    let mut submitted = record.clone();
    submitted.status = AssessmentStatus::Submitted;
    assert_eq!(
        repository.update_if(AssessmentStatus::Rejected, submitted.clone()),
        Err(RepositoryError::Conflict)
    );
    repository
        .update_if(AssessmentStatus::Draft, submitted)
        .expect("status matches");
}
