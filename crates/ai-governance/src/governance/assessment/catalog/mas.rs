use super::{detailed, option, question, section, yes_no, yes_partial_no, Catalog};
use crate::governance::assessment::domain::{Priority, QuestionKind};
use crate::governance::regulation::Regulation;

const RAPID_IDS: &[&str] = &["q1", "q2", "q3", "q4", "q7", "q7a", "q9"];

pub(super) fn catalog() -> Catalog {
    use Priority::{High, Info, Medium};
    use QuestionKind::{Checkbox, Radio, Text, Textarea};

    Catalog {
        regulation: Regulation::Mas,
        sections: vec![
            section("system_overview", "Use Case Overview"),
            section("fairness", "Fairness"),
            section("ethics", "Ethics"),
            section("accountability", "Accountability"),
            section("transparency", "Transparency"),
        ],
        questions: vec![
            question(
                "q1",
                "system_overview",
                Textarea,
                High,
                "Describe the AI and data analytics (AIDA) use case",
            ),
            question(
                "q2",
                "system_overview",
                Radio,
                High,
                "Which business function does the use case support?",
            )
            .options(vec![
                option("credit", "Credit underwriting"),
                option("insurance", "Insurance pricing or claims"),
                option("wealth", "Wealth management and advice"),
                option("aml", "AML / fraud detection"),
                option("customer_service", "Customer service"),
                option("operations", "Internal operations"),
            ]),
            question(
                "q3",
                "system_overview",
                Radio,
                High,
                "What is the materiality of the use case?",
            )
            .options(vec![
                detailed(
                    "high",
                    "High",
                    "Decisions materially affect customers' financial outcomes.",
                ),
                detailed("medium", "Medium", "Decisions are reviewed before they reach customers."),
                detailed("low", "Low", "Internal or advisory use only."),
            ]),
            question(
                "q4",
                "fairness",
                Radio,
                High,
                "Could individuals or groups be systematically disadvantaged by the use case?",
            )
            .options(yes_no()),
            question("q5", "fairness", Checkbox, Medium, "Which fairness measures are monitored?")
                .options(vec![
                    option("demographic_parity", "Demographic parity"),
                    option("equal_opportunity", "Equal opportunity"),
                    option("predictive_parity", "Predictive parity"),
                    option("none", "None yet"),
                ]),
            question(
                "q6",
                "fairness",
                Radio,
                Medium,
                "Is the use of personal attributes as model inputs justified and documented?",
            )
            .options(yes_partial_no()),
            question(
                "q7",
                "ethics",
                Radio,
                High,
                "Does the system interact directly with customers or staff?",
            )
            .options(yes_no()),
            question(
                "q7a",
                "ethics",
                Textarea,
                High,
                "Explain how people are informed the interaction is AI-driven",
            )
            .shown_when("q7", "yes"),
            question(
                "q8",
                "ethics",
                Radio,
                Medium,
                "Are decisions held to the same ethical standards as human-driven decisions?",
            )
            .options(yes_partial_no()),
            question(
                "q9",
                "accountability",
                Text,
                High,
                "Which senior management function is accountable for the use case?",
            ),
            question(
                "q10",
                "accountability",
                Radio,
                Medium,
                "Can customers appeal or request a review of AI-driven decisions?",
            )
            .options(yes_no()),
            question(
                "q11",
                "accountability",
                Radio,
                Medium,
                "Is the model independently validated before deployment?",
            )
            .options(yes_partial_no()),
            question(
                "q12",
                "transparency",
                Radio,
                Medium,
                "Are explanations of AI-driven decisions provided to customers on request?",
            )
            .options(yes_partial_no()),
            question("q13", "transparency", Text, Info, "Additional notes for reviewers")
                .optional(),
        ],
        rapid_ids: RAPID_IDS,
    }
}
