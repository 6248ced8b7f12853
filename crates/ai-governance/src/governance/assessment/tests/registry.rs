use crate::governance::assessment::domain::AssessmentMode;
use crate::governance::assessment::registry::QuestionRegistry;
use crate::governance::regulation::Regulation;

#[test]
fn rapid_questions_are_exactly_the_rapid_ids() {
    for regulation in Regulation::ordered() {
        let registry = QuestionRegistry::for_regulation(regulation);
        let rapid: Vec<&str> = registry
            .questions_for_mode(AssessmentMode::Rapid)
            .iter()
            .map(|question| question.id)
            .collect();

        let mut expected = registry.rapid_ids().to_vec();
        expected.sort_unstable();
        let mut actual = rapid.clone();
        actual.sort_unstable();
        assert_eq!(actual, expected, "{regulation}");
    }
}

#[test]
fn rapid_is_a_subset_of_comprehensive() {
    for regulation in Regulation::ordered() {
        let registry = QuestionRegistry::for_regulation(regulation);
        let comprehensive: Vec<&str> = registry
            .questions_for_mode(AssessmentMode::Comprehensive)
            .iter()
            .map(|question| question.id)
            .collect();

        let rapid = registry.questions_for_mode(AssessmentMode::Rapid);
        assert!(rapid.len() < comprehensive.len());
        for question in rapid {
            assert!(comprehensive.contains(&question.id), "{}", question.id);
        }
    }
}

#[test]
fn sections_keep_catalog_order_and_drop_empty_ones() {
    let registry = QuestionRegistry::for_regulation(Regulation::EuAiAct);

    let rapid: Vec<&str> = registry
        .sections_with_questions(AssessmentMode::Rapid)
        .iter()
        .map(|group| group.section.id)
        .collect();
    assert_eq!(
        rapid,
        vec![
            "system_overview",
            "risk_classification",
            "transparency",
            "human_oversight"
        ]
    );

    let comprehensive = registry.sections_with_questions(AssessmentMode::Comprehensive);
    assert_eq!(comprehensive.len(), 7);
    assert!(comprehensive
        .iter()
        .all(|group| !group.questions.is_empty()));
    let transparency = comprehensive
        .iter()
        .find(|group| group.section.id == "transparency")
        .expect("transparency section");
    let ids: Vec<&str> = transparency.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec!["q7", "q7a", "q8"]);
}

#[test]
fn activity_follows_mode() {
    let registry = QuestionRegistry::for_regulation(Regulation::Mas);
    assert!(registry.is_active("q9", AssessmentMode::Rapid));
    assert!(!registry.is_active("q5", AssessmentMode::Rapid));
    assert!(registry.is_active("q5", AssessmentMode::Comprehensive));
    assert!(!registry.is_active("q99", AssessmentMode::Comprehensive));
}
