use crate::infra::{demo_systems, GovernanceServices, InMemoryEvidenceStore};
use ai_governance::config::AppConfig;
use ai_governance::error::AppError;
use ai_governance::governance::assessment::{
    Answer, AssessmentMode, AssessmentSubmission, AssessmentWizard, AutosaveConfig,
    AutosaveCoordinator, DraftId, EvidenceCandidate, EvidenceStore, EvidenceUploadConfig,
    EvidenceUploader, FormPersister, FormValues, Question, QuestionKind, QuestionRegistry,
    SaveOutcome, UploadReport, WizardError,
};
use ai_governance::governance::identity::{reconcile_raw_metadata, ProfileMetadata};
use ai_governance::governance::risk::{
    calculate_overall_risk_level, MitigationStatus, OverallRiskLevel, ReviewDecision,
    RiskAssessment, RiskCategory, RiskDraft, RiskLevel,
};
use ai_governance::governance::tasks::{
    GovernanceTask, GovernanceTaskBlueprint, ImportReport, TaskStatus, TaskSummary,
};
use ai_governance::governance::{AiSystem, Regulation, SystemId};
use chrono::Local;
use clap::Args;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// Regulation to list (eu, uk or mas)
    #[arg(long, default_value = "eu")]
    pub(crate) regulation: Regulation,
    /// Questionnaire depth (rapid or comprehensive)
    #[arg(long, default_value = "rapid")]
    pub(crate) mode: AssessmentMode,
    /// Print the sections as JSON instead of a text outline
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Regulation the answers were given for (eu, uk or mas)
    #[arg(long)]
    pub(crate) regulation: Regulation,
    /// Questionnaire depth (rapid or comprehensive)
    #[arg(long, default_value = "rapid")]
    pub(crate) mode: AssessmentMode,
    /// JSON object mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Evidence file to check against the configured upload limits (repeatable)
    #[arg(long = "evidence")]
    pub(crate) evidence: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RiskLevelArgs {
    /// JSON array of risk assessments
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct TaskListArgs {
    /// Regulation whose blueprint to print (eu, uk or mas)
    #[arg(long, default_value = "eu")]
    pub(crate) regulation: Regulation,
}

#[derive(Args, Debug)]
pub(crate) struct TaskImportArgs {
    /// Demo system whose tasks receive the tracker statuses
    #[arg(long, default_value = "sys-support-chatbot")]
    pub(crate) system: String,
    /// Tracker CSV export with Task, Status and Evidence columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Regulation to run the questionnaire for (eu, uk or mas)
    #[arg(long, default_value = "eu")]
    pub(crate) regulation: Regulation,
    /// Questionnaire depth (rapid or comprehensive)
    #[arg(long, default_value = "rapid")]
    pub(crate) mode: AssessmentMode,
    /// Optional tracker CSV export applied to the demo system's tasks
    #[arg(long)]
    pub(crate) tracker_csv: Option<PathBuf>,
    /// Skip the risk review portion of the demo
    #[arg(long)]
    pub(crate) skip_risk: bool,
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let registry = QuestionRegistry::for_regulation(args.regulation);
    let sections = registry.sections_with_questions(args.mode);

    if args.json {
        let rendered = serde_json::to_string_pretty(&sections).map_err(io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    let total: usize = sections.iter().map(|entry| entry.questions.len()).sum();
    println!(
        "{} | {} mode | {} questions in {} sections",
        args.regulation,
        args.mode,
        total,
        sections.len()
    );
    for entry in &sections {
        println!("\n{}", entry.section.title);
        for question in &entry.questions {
            println!("  {}", describe_question(question));
            for option in &question.options {
                println!("      - {} ({})", option.label, option.value);
            }
        }
    }
    Ok(())
}

fn describe_question(question: &Question) -> String {
    let mut line = format!("[{}] {}", question.id, question.title);
    if !question.required {
        line.push_str(" (optional)");
    }
    if let Some(condition) = question.condition {
        line.push_str(&format!(
            " (shown when {} = {})",
            condition.depends_on, condition.equals
        ));
    }
    line
}

pub(crate) async fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.answers)?;
    let values: FormValues = serde_json::from_str(&raw).map_err(io::Error::from)?;
    let schema = QuestionRegistry::for_regulation(args.regulation).schema_for_mode(args.mode);

    match schema.validate(&values) {
        Ok(()) => println!(
            "Answers are valid for {} ({} mode, {} active fields)",
            args.regulation,
            args.mode,
            schema.active_fields(&values).len()
        ),
        Err(errors) => {
            println!("{} field(s) need attention:", errors.len());
            for (field, message) in errors.iter() {
                println!("  - {field}: {message}");
            }
        }
    }

    if args.evidence.is_empty() {
        return Ok(());
    }

    let config = AppConfig::load()?;
    let candidates = args
        .evidence
        .iter()
        .map(|path| evidence_candidate(path))
        .collect::<Result<Vec<_>, io::Error>>()?;
    let mut uploader = EvidenceUploader::new(EvidenceUploadConfig::from(&config.assessment));
    let report = uploader.add_files(candidates, None).await;
    render_upload_report(&report);
    Ok(())
}

fn evidence_candidate(path: &Path) -> Result<EvidenceCandidate, io::Error> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(EvidenceCandidate {
        name,
        size_bytes: metadata.len(),
        content_type: mime_guess::from_path(path).first_or_octet_stream(),
        question_id: None,
    })
}

pub(crate) fn run_risk_level(args: RiskLevelArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let assessments: Vec<RiskAssessment> =
        serde_json::from_str(&raw).map_err(io::Error::from)?;

    let overall = calculate_overall_risk_level(&assessments);
    println!("{} risk assessments read", assessments.len());
    render_overall_risk(&overall);
    Ok(())
}

pub(crate) fn run_task_list(args: TaskListArgs) -> Result<(), AppError> {
    let blueprint = GovernanceTaskBlueprint::for_regulation(args.regulation);
    println!("{} governance tasks", blueprint.regulation());
    for template in blueprint.task_templates() {
        let marker = if template.blocking { "blocking" } else { "advisory" };
        print!("- [{marker}] {} ({})", template.title, template.key);
        match template.depends_on {
            Some(dependency) => println!(" after {dependency}"),
            None => println!(),
        }
    }
    Ok(())
}

pub(crate) fn run_task_import(args: TaskImportArgs) -> Result<(), AppError> {
    let services = GovernanceServices::in_memory(demo_systems());
    let system_id = SystemId(args.system);

    services.tasks.seed(&system_id)?;
    let file = File::open(&args.csv)?;
    let report = services.tasks.import_status(&system_id, file)?;
    render_import_report(&report);

    let tasks = services.tasks.list(&system_id)?;
    render_tasks(&tasks);
    render_task_summary(&TaskSummary::from_tasks(&tasks));
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        regulation,
        mode,
        tracker_csv,
        skip_risk,
    } = args;

    let config = AppConfig::load()?;
    let services = GovernanceServices::in_memory(demo_systems());
    let Some(system) = services
        .systems
        .all()
        .into_iter()
        .find(|system| {
            system.regulation == regulation && system.lifecycle_stage.can_create_risk_assessment()
        })
    else {
        println!("No active demo system is registered for {regulation}");
        return Ok(());
    };

    println!(
        "AI governance assessment demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!(
        "System: {} ({}) | {} | lifecycle stage {}",
        system.name, system.id, system.regulation, system.lifecycle_stage
    );

    println!("\nQuestionnaire ({mode} mode)");
    let registry = QuestionRegistry::for_regulation(regulation);
    let draft_id = DraftId(format!("draft-{}", system.id));
    let mut autosave = AutosaveCoordinator::new(
        services
            .assessments
            .draft_persister(draft_id.clone(), regulation, mode),
        AutosaveConfig::from(&config.assessment),
    );

    let mut wizard = AssessmentWizard::new(registry, mode);
    let submission = walk_wizard(&mut wizard, &autosave).await;

    match autosave.save_now().await {
        SaveOutcome::Saved => match services.assessments.draft(&draft_id) {
            Ok(draft) => println!(
                "- Draft {} autosaved with {} answers",
                draft.draft_id.0,
                draft.values.len()
            ),
            Err(err) => println!("- Draft saved but could not be read back: {err}"),
        },
        SaveOutcome::Failed(err) => println!("- Autosave failed: {err}"),
        SaveOutcome::Skipped => println!("- Autosave skipped, a save was already running"),
    }
    autosave.shutdown();

    match submission {
        Ok(submission) => {
            match services
                .assessments
                .submit_wizard(submission, Some(system.id.clone()))
            {
                Ok(record) => println!(
                    "- Submitted {} with {} answers",
                    record.submission_id.0,
                    record.values.len()
                ),
                Err(err) => println!("- Submission rejected: {err}"),
            }
        }
        Err(err) => println!("- Wizard stopped: {err}"),
    }

    println!("\nEvidence upload");
    let mut uploader = EvidenceUploader::new(EvidenceUploadConfig::from(&config.assessment));
    let first_question = registry
        .questions_for_mode(mode)
        .first()
        .map(|question| question.id.to_string());
    let store = InMemoryEvidenceStore::default();
    let report = uploader
        .add_files(demo_evidence(first_question), Some(&store as &dyn EvidenceStore))
        .await;
    render_upload_report(&report);
    println!(
        "- {} files handed to the store | {} upload slots left",
        store.uploaded().len(),
        uploader.remaining_slots()
    );

    println!("\nReviewer sign-in");
    let reviewer = reviewer_profile();
    println!(
        "- Signed in as {} (first name {}, last name {})",
        reviewer.full_name.as_deref().unwrap_or("unknown"),
        reviewer.first_name.as_deref().unwrap_or("-"),
        reviewer.last_name.as_deref().unwrap_or("-")
    );

    if !skip_risk {
        println!("\nRisk review");
        run_risk_review(&services, &system);
    }

    println!("\nGovernance tasks");
    run_task_walkthrough(&services, &system.id, tracker_csv.as_deref())?;
    Ok(())
}

async fn walk_wizard<P>(
    wizard: &mut AssessmentWizard,
    autosave: &AutosaveCoordinator<P>,
) -> Result<AssessmentSubmission, WizardError>
where
    P: FormPersister,
{
    loop {
        let page = wizard.current_page();
        answer_current_page(wizard)?;
        autosave.record_change(wizard.values().clone()).await;
        println!(
            "- Page {}/{} {}: {} answers",
            page + 1,
            wizard.page_count(),
            wizard.pages()[page].section.title,
            wizard.current_questions().len()
        );

        if wizard.is_last_page() {
            break;
        }
        wizard.next()?;
    }
    wizard.submit()
}

/// Answers every unanswered question on the page, repeating while answers
/// reveal conditional follow-ups.
fn answer_current_page(wizard: &mut AssessmentWizard) -> Result<(), WizardError> {
    loop {
        let unanswered: Vec<&'static Question> = wizard
            .current_questions()
            .into_iter()
            .filter(|question| wizard.values().get(question.id).is_none())
            .collect();
        if unanswered.is_empty() {
            return Ok(());
        }
        for question in unanswered {
            wizard.set_value(question.id, demo_answer(question))?;
        }
    }
}

fn demo_answer(question: &Question) -> Answer {
    let first_option = question.options.first().map(|option| option.value);
    match question.kind {
        QuestionKind::Checkbox => Answer::choices(first_option),
        QuestionKind::Radio => Answer::text(first_option.unwrap_or_default()),
        QuestionKind::Text | QuestionKind::Textarea => {
            Answer::text(format!("Demo response: {}", question.title))
        }
    }
}

fn demo_evidence(question_id: Option<String>) -> Vec<EvidenceCandidate> {
    [
        ("model-card.pdf", 240 * 1024),
        ("fairness-metrics.csv", 18 * 1024),
        ("architecture.svg", 96 * 1024),
        ("training-sample.png", 14 * 1024 * 1024),
    ]
    .into_iter()
    .map(|(name, size_bytes)| EvidenceCandidate {
        name: name.to_string(),
        size_bytes,
        content_type: mime_guess::from_path(name).first_or_octet_stream(),
        question_id: question_id.clone(),
    })
    .collect()
}

fn render_upload_report(report: &UploadReport) {
    for file in &report.admitted {
        println!(
            "- Admitted {} ({}, {})",
            file.name,
            file.content_type,
            ai_governance::governance::assessment::format_size(file.size_bytes)
        );
    }
    for rejection in &report.rejections {
        println!("- Rejected: {}", rejection.message);
    }
}

/// Reviewer who typed a first name at sign-up and then signed in with a
/// provider that only sends a display name.
fn reviewer_profile() -> ProfileMetadata {
    let stored = ProfileMetadata {
        first_name: Some("Amara".to_string()),
        ..ProfileMetadata::default()
    };
    let provider = serde_json::json!({
        "name": "Amara Osei",
        "given_name": "A.",
        "email_verified": true,
    });
    reconcile_raw_metadata(&stored, &provider)
}

fn run_risk_review(services: &GovernanceServices, system: &AiSystem) {
    let reviewer = ReviewDecision {
        reviewer: "governance-board@example.com".to_string(),
        notes: Some("Accepted with a quarterly re-test".to_string()),
    };

    for draft in demo_risk_drafts() {
        let category = draft.category;
        let created = match services.risks.create(&system.id, draft) {
            Ok(created) => created,
            Err(err) => {
                println!("- {category}: not recorded ({err})");
                continue;
            }
        };
        let outcome = services
            .risks
            .submit(&created.id)
            .and_then(|submitted| services.risks.approve(&submitted.id, reviewer.clone()));
        match outcome {
            Ok(approved) => println!(
                "- {} {} risk {} -> {}",
                approved.id.0, approved.risk_level, approved.category, approved.status
            ),
            Err(err) => println!(
                "- {} {} risk {} stays in {}: {err}",
                created.id.0, created.risk_level, created.category, created.status
            ),
        }
    }

    match services.risks.overall_risk(&system.id) {
        Ok(overall) => render_overall_risk(&overall),
        Err(err) => println!("- Overall risk unavailable: {err}"),
    }

    let retired = services
        .systems
        .all()
        .into_iter()
        .find(|candidate| !candidate.lifecycle_stage.can_create_risk_assessment());
    if let Some(retired) = retired {
        let draft = RiskDraft {
            category: RiskCategory::Robustness,
            summary: "Model drift after retirement".to_string(),
            risk_level: RiskLevel::Low,
            mitigation_status: MitigationStatus::NotStarted,
            evidence_links: Vec::new(),
            assessed_by: "model-risk@example.com".to_string(),
        };
        if let Err(err) = services.risks.create(&retired.id, draft) {
            println!("- {} ({}) refuses new findings: {err}", retired.name, retired.id);
        }
    }
}

fn demo_risk_drafts() -> Vec<RiskDraft> {
    vec![
        RiskDraft {
            category: RiskCategory::Bias,
            summary: "Approval rates differ across age bands".to_string(),
            risk_level: RiskLevel::High,
            mitigation_status: MitigationStatus::InProgress,
            evidence_links: vec!["https://docs.example.com/fairness/age-bands".to_string()],
            assessed_by: "model-risk@example.com".to_string(),
        },
        RiskDraft {
            category: RiskCategory::Privacy,
            summary: "Feature store keeps raw postcodes".to_string(),
            risk_level: RiskLevel::Medium,
            mitigation_status: MitigationStatus::Mitigated,
            evidence_links: Vec::new(),
            assessed_by: "privacy-office@example.com".to_string(),
        },
        RiskDraft {
            category: RiskCategory::Explainability,
            summary: "Adverse action reasons are not generated".to_string(),
            risk_level: RiskLevel::High,
            mitigation_status: MitigationStatus::NotStarted,
            evidence_links: Vec::new(),
            assessed_by: "model-risk@example.com".to_string(),
        },
    ]
}

fn render_overall_risk(overall: &OverallRiskLevel) {
    let category = overall
        .highest_category
        .map(|category| category.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!(
        "- Overall risk {} (driven by {}) | {} approved | {} mitigated",
        overall.level, category, overall.assessment_count, overall.mitigated_count
    );
}

fn run_task_walkthrough(
    services: &GovernanceServices,
    system_id: &SystemId,
    tracker_csv: Option<&Path>,
) -> Result<(), AppError> {
    let seeded = services.tasks.seed(system_id)?;
    println!("- Seeded {} tasks", seeded.len());

    let first_open = seeded
        .iter()
        .find(|task| task.blocking && task.status == TaskStatus::Pending);
    if let Some(task) = first_open {
        let link = format!("https://docs.example.com/governance/{}", task.key);
        match services.tasks.complete(&task.id, Some(link)) {
            Ok(done) => println!("- Completed {} with evidence", done.title),
            Err(err) => println!("- Could not complete {}: {err}", task.title),
        }
    }

    if let Some(path) = tracker_csv {
        let file = File::open(path)?;
        let report = services.tasks.import_status(system_id, file)?;
        render_import_report(&report);
    }

    let tasks = services.tasks.list(system_id)?;
    render_tasks(&tasks);
    render_task_summary(&TaskSummary::from_tasks(&tasks));
    Ok(())
}

fn render_tasks(tasks: &[GovernanceTask]) {
    for task in tasks {
        let marker = if task.blocking { "*" } else { " " };
        println!("  {marker} {:<9} {}", task.status.label(), task.title);
    }
}

fn render_import_report(report: &ImportReport) {
    println!(
        "- Tracker import: {} completed | {} released | {} unmatched | {} rejected",
        report.completed.len(),
        report.released.len(),
        report.unmatched.len(),
        report.rejected.len()
    );
    for name in &report.unmatched {
        println!("  unmatched row: {name}");
    }
    for rejection in &report.rejected {
        println!("  rejected {}: {}", rejection.task, rejection.message);
    }
}

fn render_task_summary(summary: &TaskSummary) {
    println!(
        "- {}/{} tasks completed | {} blocked | {} open blockers | deployment ready: {}",
        summary.completed,
        summary.total,
        summary.blocked,
        summary.open_blockers,
        if summary.deployment_ready { "yes" } else { "no" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_answers_fill_every_rapid_page() {
        for regulation in Regulation::ordered() {
            let registry = QuestionRegistry::for_regulation(regulation);
            let mut wizard = AssessmentWizard::new(registry, AssessmentMode::Rapid);
            loop {
                answer_current_page(&mut wizard).expect("demo answers accepted");
                if wizard.is_last_page() {
                    break;
                }
                wizard.next().expect("page validates");
            }
            let submission = wizard.submit().expect("wizard submits");
            assert_eq!(submission.regulation, regulation);
            assert!(!submission.values.is_empty());
        }
    }

    #[test]
    fn demo_evidence_guesses_content_types() {
        let candidates = demo_evidence(Some("q1".to_string()));
        assert_eq!(candidates[0].content_type.essence_str(), "application/pdf");
        assert_eq!(candidates[1].content_type.essence_str(), "text/csv");
        assert!(candidates
            .iter()
            .all(|candidate| candidate.question_id.as_deref() == Some("q1")));
    }

    #[tokio::test]
    async fn demo_evidence_rejects_unsupported_and_oversized_files() {
        let mut uploader = EvidenceUploader::new(EvidenceUploadConfig::default());
        let store = InMemoryEvidenceStore::default();
        let report = uploader
            .add_files(demo_evidence(None), Some(&store as &dyn EvidenceStore))
            .await;

        assert_eq!(report.admitted.len(), 2);
        assert_eq!(
            store.uploaded(),
            vec!["model-card.pdf".to_string(), "fairness-metrics.csv".to_string()]
        );
        assert_eq!(report.rejections.len(), 2);
        assert!(report.rejections[0].message.contains("architecture.svg"));
        assert!(report.rejections[1].message.contains("exceeds the maximum size"));
    }

    #[test]
    fn demo_risk_review_approves_evidenced_findings_only() {
        let services = GovernanceServices::in_memory(demo_systems());
        let system = services
            .systems
            .all()
            .into_iter()
            .find(|system| system.id.0 == "sys-credit-scoring")
            .expect("demo system");

        run_risk_review(&services, &system);

        let overall = services.risks.overall_risk(&system.id).expect("overall");
        assert_eq!(overall.level, RiskLevel::High);
        assert_eq!(overall.highest_category, Some(RiskCategory::Bias));
        assert_eq!(overall.assessment_count, 2);
        assert_eq!(overall.mitigated_count, 1);
    }

    #[test]
    fn reviewer_profile_keeps_the_typed_first_name() {
        let profile = reviewer_profile();
        assert_eq!(profile.first_name.as_deref(), Some("Amara"));
        assert_eq!(profile.last_name.as_deref(), Some("Osei"));
        assert_eq!(profile.full_name.as_deref(), Some("Amara Osei"));
    }

    #[test]
    fn task_walkthrough_completes_first_blocker() {
        let services = GovernanceServices::in_memory(demo_systems());
        let system_id = SystemId("sys-fraud-detection".to_string());

        run_task_walkthrough(&services, &system_id, None).expect("walkthrough runs");

        let tasks = services.tasks.list(&system_id).expect("tasks");
        let completed: Vec<&GovernanceTask> = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].blocking);
        assert!(completed[0]
            .evidence_link
            .as_deref()
            .is_some_and(|link| link.ends_with(&completed[0].key)));
    }
}
