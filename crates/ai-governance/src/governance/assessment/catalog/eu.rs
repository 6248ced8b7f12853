use super::{detailed, option, question, section, yes_no, yes_partial_no, Catalog};
use crate::governance::assessment::domain::{Priority, QuestionKind};
use crate::governance::regulation::Regulation;

const RAPID_IDS: &[&str] = &["q1", "q2", "q3", "q4", "q7", "q7a", "q11"];

pub(super) fn catalog() -> Catalog {
    use Priority::{High, Info, Low, Medium};
    use QuestionKind::{Checkbox, Radio, Text, Textarea};

    Catalog {
        regulation: Regulation::EuAiAct,
        sections: vec![
            section("system_overview", "System Overview"),
            section("risk_classification", "Risk Classification"),
            section("transparency", "Transparency Obligations"),
            section("data_governance", "Data & Data Governance"),
            section("human_oversight", "Human Oversight"),
            section("accuracy_robustness", "Accuracy, Robustness & Cybersecurity"),
            section("documentation", "Technical Documentation"),
        ],
        questions: vec![
            question(
                "q1",
                "system_overview",
                Textarea,
                High,
                "Describe the intended purpose of the AI system",
            )
            .describe(
                "Include the users, the decisions the system supports and the context it is deployed in.",
            ),
            question(
                "q2",
                "system_overview",
                Radio,
                High,
                "What is your organisation's role for this system?",
            )
            .options(vec![
                detailed(
                    "provider",
                    "Provider",
                    "Develops the system or places it on the market under its own name.",
                ),
                detailed(
                    "deployer",
                    "Deployer",
                    "Uses the system under its authority in a professional activity.",
                ),
                option("importer", "Importer"),
                option("distributor", "Distributor"),
            ]),
            question(
                "q3",
                "risk_classification",
                Checkbox,
                High,
                "Is the system used in any Annex III high-risk area?",
            )
            .options(vec![
                option("biometrics", "Biometric identification or categorisation"),
                option("critical_infrastructure", "Critical infrastructure"),
                option("education", "Education and vocational training"),
                option("employment", "Employment and worker management"),
                option("essential_services", "Access to essential private or public services"),
                option("law_enforcement", "Law enforcement"),
                option("migration", "Migration, asylum and border control"),
                option("justice", "Administration of justice and democratic processes"),
                option("none", "None of the above"),
            ]),
            question(
                "q4",
                "risk_classification",
                Radio,
                High,
                "Does the system perform any practice prohibited under Article 5?",
            )
            .describe(
                "For example social scoring, manipulative techniques or untargeted facial image scraping.",
            )
            .options(yes_no()),
            question(
                "q5",
                "risk_classification",
                Radio,
                Medium,
                "Is the system a safety component of a product covered by Annex I legislation?",
            )
            .options(vec![
                option("yes", "Yes"),
                option("no", "No"),
                option("unsure", "Not sure"),
            ]),
            question(
                "q6",
                "risk_classification",
                Radio,
                Medium,
                "Is the system a general-purpose AI model or built on one?",
            )
            .options(yes_no()),
            question(
                "q7",
                "transparency",
                Radio,
                High,
                "Does the system interact directly with natural persons?",
            )
            .describe(
                "Chatbots, voice assistants and systems generating content shown to people all count.",
            )
            .options(yes_no()),
            question(
                "q7a",
                "transparency",
                Textarea,
                High,
                "Explain how people are informed they are interacting with an AI system",
            )
            .shown_when("q7", "yes"),
            question(
                "q8",
                "transparency",
                Radio,
                Medium,
                "Does the system perform emotion recognition or biometric categorisation?",
            )
            .options(yes_no()),
            question(
                "q9",
                "data_governance",
                Radio,
                High,
                "Are training, validation and testing data sets subject to documented governance?",
            )
            .options(vec![
                option("documented", "Fully documented"),
                option("partial", "Partially documented"),
                option("none", "Not documented"),
            ]),
            question(
                "q10",
                "data_governance",
                Checkbox,
                Medium,
                "Which categories of personal data does the system process?",
            )
            .options(vec![
                option("none", "No personal data"),
                option("personal", "Personal data"),
                option("special_category", "Special category data"),
                option("children", "Data relating to children"),
            ]),
            question("q11", "human_oversight", Radio, High, "Which human oversight model applies?")
                .options(vec![
                    detailed(
                        "human_in_the_loop",
                        "Human in the loop",
                        "A person approves every output before it takes effect.",
                    ),
                    detailed(
                        "human_on_the_loop",
                        "Human on the loop",
                        "A person monitors operation and can intervene.",
                    ),
                    detailed(
                        "human_in_command",
                        "Human in command",
                        "A person decides when and how the system is used.",
                    ),
                    option("none", "No human oversight"),
                ]),
            question(
                "q12",
                "human_oversight",
                Textarea,
                Low,
                "Describe how operators can override or stop the system",
            )
            .optional(),
            question(
                "q13",
                "accuracy_robustness",
                Textarea,
                Medium,
                "Which accuracy metrics are declared and how are they measured?",
            ),
            question(
                "q14",
                "accuracy_robustness",
                Radio,
                Medium,
                "Is there post-market monitoring and serious incident reporting in place?",
            )
            .options(yes_partial_no()),
            question(
                "q15",
                "documentation",
                Radio,
                Medium,
                "Is Annex IV technical documentation maintained for the system?",
            )
            .options(yes_partial_no()),
            question("q16", "documentation", Text, Info, "Additional notes for reviewers")
                .optional(),
        ],
        rapid_ids: RAPID_IDS,
    }
}
