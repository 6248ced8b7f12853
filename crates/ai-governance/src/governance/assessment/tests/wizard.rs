use super::common::*;
use crate::governance::assessment::domain::{Answer, AssessmentMode};
use crate::governance::assessment::registry::QuestionRegistry;
use crate::governance::assessment::wizard::{AssessmentWizard, WizardError};
use crate::governance::regulation::Regulation;

fn rapid_wizard() -> AssessmentWizard {
    AssessmentWizard::new(
        QuestionRegistry::for_regulation(Regulation::EuAiAct),
        AssessmentMode::Rapid,
    )
}

fn answer_all(wizard: &mut AssessmentWizard) {
    for (id, answer) in eu_rapid_values().iter() {
        wizard.set_value(id, answer.clone()).expect("rapid question");
    }
}

#[test]
fn pages_follow_the_sections_of_the_mode() {
    let wizard = rapid_wizard();
    let sections: Vec<&str> = wizard.pages().iter().map(|page| page.section.id).collect();
    assert_eq!(
        sections,
        vec![
            "system_overview",
            "risk_classification",
            "transparency",
            "human_oversight"
        ]
    );
    assert_eq!(wizard.current_page(), 0);
}

#[test]
fn next_flags_only_the_current_page() {
    let mut wizard = rapid_wizard();
    wizard
        .set_value("q1", Answer::text("Triage assistant"))
        .expect("q1 is rapid");

    match wizard.next() {
        Err(WizardError::Validation(errors)) => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["q2"]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(wizard.current_page(), 0);
    assert!(wizard.error("q2").is_some());
    assert!(wizard.is_touched("q2"));
    assert!(wizard.error("q3").is_none(), "later pages are not validated");

    wizard
        .set_value("q2", Answer::text("deployer"))
        .expect("q2 is rapid");
    assert!(wizard.error("q2").is_none(), "editing clears the error");
    assert_eq!(wizard.next(), Ok(1));
    assert!(wizard.is_completed(0));
}

#[test]
fn follow_up_appears_once_the_trigger_is_yes() {
    let mut wizard = rapid_wizard();
    answer_all(&mut wizard);
    wizard.next().expect("page 0");
    wizard.next().expect("page 1");

    let visible: Vec<&str> = wizard.current_questions().iter().map(|q| q.id).collect();
    assert_eq!(visible, vec!["q7"]);

    wizard
        .set_value("q7", Answer::text("yes"))
        .expect("q7 is rapid");
    let visible: Vec<&str> = wizard.current_questions().iter().map(|q| q.id).collect();
    assert_eq!(visible, vec!["q7", "q7a"]);

    match wizard.next() {
        Err(WizardError::Validation(errors)) => assert!(errors.contains("q7a")),
        other => panic!("expected q7a to be required, got {other:?}"),
    }
}

#[test]
fn step_navigation_only_reaches_unlocked_pages() {
    let mut wizard = rapid_wizard();
    answer_all(&mut wizard);

    assert_eq!(wizard.go_to(2), Err(WizardError::PageLocked(2)));
    assert_eq!(
        wizard.go_to(9),
        Err(WizardError::PageOutOfRange { page: 9, pages: 4 })
    );

    assert_eq!(wizard.go_to(1), Ok(1));
    assert_eq!(wizard.go_to(2), Ok(2));
    assert_eq!(wizard.go_to(3), Ok(3));
    assert_eq!(wizard.back(), 2);
    assert_eq!(wizard.go_to(0), Ok(0));
    assert_eq!(wizard.go_to(2), Ok(2), "completed pages stay reachable");
}

#[test]
fn unknown_and_inactive_questions_are_rejected() {
    let mut wizard = rapid_wizard();
    assert_eq!(
        wizard.set_value("q42", Answer::text("x")),
        Err(WizardError::UnknownQuestion("q42".to_string()))
    );
    assert_eq!(
        wizard.set_value("q13", Answer::text("x")),
        Err(WizardError::InactiveQuestion {
            id: "q13".to_string(),
            mode: AssessmentMode::Rapid,
        })
    );
}

#[test]
fn submit_stays_put_and_flags_offending_fields() {
    let mut wizard = rapid_wizard();
    answer_all(&mut wizard);
    wizard.clear_value("q11");
    wizard.next().expect("page 0");

    match wizard.submit() {
        Err(WizardError::Validation(errors)) => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["q11"]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(wizard.current_page(), 1);
    assert!(wizard.error("q11").is_some());
}

#[test]
fn submit_returns_only_active_answers() {
    let mut wizard = AssessmentWizard::resume(
        QuestionRegistry::for_regulation(Regulation::EuAiAct),
        AssessmentMode::Comprehensive,
        eu_comprehensive_values(),
    );
    wizard.set_mode(AssessmentMode::Rapid);
    assert_eq!(wizard.current_page(), 0);
    assert_eq!(wizard.page_count(), 4);

    let submission = wizard.submit().expect("rapid answers are complete");
    assert_eq!(submission.regulation, Regulation::EuAiAct);
    assert_eq!(submission.mode, AssessmentMode::Rapid);
    assert_eq!(submission.values, eu_rapid_values());
    assert!(
        wizard.values().get("q13").is_some(),
        "switching mode keeps answers"
    );
}

#[test]
fn last_page_cannot_advance() {
    let mut wizard = rapid_wizard();
    answer_all(&mut wizard);
    for _ in 0..3 {
        wizard.next().expect("advance");
    }
    assert!(wizard.is_last_page());
    assert_eq!(wizard.next(), Err(WizardError::LastPage));
}
