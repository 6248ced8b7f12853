use super::{option, question, section, yes_no, yes_partial_no, Catalog};
use crate::governance::assessment::domain::{Priority, QuestionKind};
use crate::governance::regulation::Regulation;

const RAPID_IDS: &[&str] = &["q1", "q2", "q3", "q7", "q7a", "q8", "q10"];

pub(super) fn catalog() -> Catalog {
    use Priority::{High, Info, Low, Medium};
    use QuestionKind::{Checkbox, Radio, Text, Textarea};

    Catalog {
        regulation: Regulation::UkAiFramework,
        sections: vec![
            section("system_overview", "System Overview"),
            section("safety_security", "Safety, Security & Robustness"),
            section("transparency", "Transparency & Explainability"),
            section("fairness", "Fairness"),
            section("accountability", "Accountability & Governance"),
            section("contestability", "Contestability & Redress"),
        ],
        questions: vec![
            question(
                "q1",
                "system_overview",
                Textarea,
                High,
                "Describe what the AI system does and who relies on its outputs",
            ),
            question(
                "q2",
                "system_overview",
                Radio,
                High,
                "Which sector regulator is most relevant to this system?",
            )
            .options(vec![
                option("fca", "Financial Conduct Authority"),
                option("ico", "Information Commissioner's Office"),
                option("cma", "Competition and Markets Authority"),
                option("ofcom", "Ofcom"),
                option("mhra", "Medicines and Healthcare products Regulatory Agency"),
                option("ehrc", "Equality and Human Rights Commission"),
                option("other", "Other or none"),
            ]),
            question(
                "q3",
                "system_overview",
                Radio,
                High,
                "How significant is the system's impact on individuals?",
            )
            .options(vec![
                option("significant", "Significant (legal or similarly material effects)"),
                option("moderate", "Moderate"),
                option("minimal", "Minimal"),
            ]),
            question(
                "q4",
                "safety_security",
                Radio,
                Medium,
                "Has the system been tested for safety failures before release?",
            )
            .options(yes_partial_no()),
            question(
                "q5",
                "safety_security",
                Checkbox,
                Medium,
                "Which security controls protect the model and its data?",
            )
            .options(vec![
                option("adversarial_testing", "Adversarial testing"),
                option("access_controls", "Access controls"),
                option("model_monitoring", "Runtime model monitoring"),
                option("red_teaming", "Red teaming"),
                option("none", "None yet"),
            ]),
            question(
                "q6",
                "transparency",
                Radio,
                Medium,
                "Can the system's outputs be explained to affected people?",
            )
            .options(vec![
                option("full", "Yes, per decision"),
                option("global", "Only at model level"),
                option("none", "No"),
            ]),
            question(
                "q7",
                "transparency",
                Radio,
                High,
                "Does the system interact directly with people?",
            )
            .options(yes_no()),
            question(
                "q7a",
                "transparency",
                Textarea,
                High,
                "Explain how people are told they are dealing with an AI system",
            )
            .shown_when("q7", "yes"),
            question(
                "q8",
                "fairness",
                Radio,
                High,
                "Has the system been tested for biased or discriminatory outcomes?",
            )
            .options(yes_partial_no()),
            question(
                "q9",
                "fairness",
                Checkbox,
                Medium,
                "Which protected characteristics were considered in fairness testing?",
            )
            .describe("Equality Act 2010 protected characteristics.")
            .options(vec![
                option("age", "Age"),
                option("disability", "Disability"),
                option("race", "Race"),
                option("religion", "Religion or belief"),
                option("sex", "Sex"),
                option("sexual_orientation", "Sexual orientation"),
                option("none", "None considered"),
            ]),
            question(
                "q10",
                "accountability",
                Text,
                High,
                "Who is the accountable owner for this system?",
            ),
            question(
                "q11",
                "accountability",
                Radio,
                Medium,
                "Is the system overseen by an AI governance board or committee?",
            )
            .options(yes_no()),
            question(
                "q12",
                "contestability",
                Radio,
                Medium,
                "Can affected people contest an outcome produced by the system?",
            )
            .options(yes_no()),
            question(
                "q13",
                "contestability",
                Textarea,
                Medium,
                "Describe the route for contesting outcomes and obtaining redress",
            )
            .shown_when("q12", "yes"),
            question(
                "q14",
                "contestability",
                Textarea,
                Low,
                "How are contested outcomes fed back into model improvements?",
            )
            .optional(),
            question("q15", "accountability", Text, Info, "Additional notes for reviewers")
                .optional(),
        ],
        rapid_ids: RAPID_IDS,
    }
}
