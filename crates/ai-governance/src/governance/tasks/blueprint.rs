use super::domain::TaskTemplate;
use crate::governance::regulation::Regulation;

/// Governance tasks every system under a regulation starts with.
#[derive(Debug)]
pub struct GovernanceTaskBlueprint {
    regulation: Regulation,
    tasks: Vec<TaskTemplate>,
}

impl GovernanceTaskBlueprint {
    pub fn for_regulation(regulation: Regulation) -> Self {
        let tasks = match regulation {
            Regulation::EuAiAct => eu_templates(),
            Regulation::UkAiFramework => uk_templates(),
            Regulation::Mas => mas_templates(),
        };
        Self { regulation, tasks }
    }

    pub fn regulation(&self) -> Regulation {
        self.regulation
    }

    pub fn task_templates(&self) -> &[TaskTemplate] {
        &self.tasks
    }

    pub fn template(&self, key: &str) -> Option<&TaskTemplate> {
        self.tasks.iter().find(|template| template.key == key)
    }

    pub fn blocking_templates(&self) -> impl Iterator<Item = &TaskTemplate> {
        self.tasks.iter().filter(|template| template.blocking)
    }
}

fn template(
    key: &'static str,
    title: &'static str,
    description: &'static str,
    blocking: bool,
) -> TaskTemplate {
    TaskTemplate {
        key,
        title,
        description,
        blocking,
        depends_on: None,
        related_kind: None,
    }
}

fn after(mut template: TaskTemplate, key: &'static str) -> TaskTemplate {
    template.depends_on = Some(key);
    template
}

fn questionnaire(mut template: TaskTemplate) -> TaskTemplate {
    template.related_kind = Some("questionnaire");
    template
}

fn eu_templates() -> Vec<TaskTemplate> {
    vec![
        questionnaire(template(
            "eu_risk_classification",
            "Classify the system under the EU AI Act",
            "Complete the EU questionnaire to establish whether the system is prohibited, high-risk or limited-risk.",
            true,
        )),
        after(
            template(
                "eu_technical_documentation",
                "Prepare Annex IV technical documentation",
                "Document the system design, data sources, training methodology and performance metrics.",
                true,
            ),
            "eu_risk_classification",
        ),
        after(
            template(
                "eu_human_oversight",
                "Define human oversight measures",
                "Name the people who can intervene, the tools they use and when they must act.",
                true,
            ),
            "eu_risk_classification",
        ),
        template(
            "eu_transparency_notice",
            "Publish the transparency notice",
            "Tell users they are interacting with an AI system and how its outputs are produced.",
            false,
        ),
        after(
            template(
                "eu_conformity_assessment",
                "Complete the conformity assessment",
                "Run the internal or notified-body conformity assessment and register the system where required.",
                true,
            ),
            "eu_technical_documentation",
        ),
        template(
            "eu_post_market_monitoring",
            "Set up post-market monitoring",
            "Collect performance data in production and define the serious incident reporting path.",
            false,
        ),
    ]
}

fn uk_templates() -> Vec<TaskTemplate> {
    vec![
        questionnaire(template(
            "uk_principles_review",
            "Assess the system against the UK AI principles",
            "Complete the UK questionnaire covering safety, transparency, fairness, accountability and contestability.",
            true,
        )),
        after(
            template(
                "uk_fairness_testing",
                "Run fairness testing",
                "Measure outcome differences across protected characteristics and record the thresholds used.",
                true,
            ),
            "uk_principles_review",
        ),
        template(
            "uk_accountability_owner",
            "Name an accountable owner",
            "Assign a senior owner responsible for the system's outcomes.",
            true,
        ),
        template(
            "uk_transparency_statement",
            "Publish a transparency statement",
            "Explain to affected people how the system is used and what it decides.",
            false,
        ),
        template(
            "uk_contestability_route",
            "Provide a route to contest decisions",
            "Document how people can challenge an outcome and obtain human review.",
            false,
        ),
    ]
}

fn mas_templates() -> Vec<TaskTemplate> {
    vec![
        questionnaire(template(
            "mas_feat_assessment",
            "Assess the system against the FEAT principles",
            "Complete the MAS questionnaire on fairness, ethics, accountability and transparency.",
            true,
        )),
        after(
            template(
                "mas_fairness_review",
                "Review fairness of model outcomes",
                "Check that individuals or groups are not systematically disadvantaged without justification.",
                true,
            ),
            "mas_feat_assessment",
        ),
        template(
            "mas_ethics_review",
            "Align use with the firm's ethical standards",
            "Record how the system's use is consistent with the firm's code of conduct.",
            false,
        ),
        after(
            template(
                "mas_accountability_sign_off",
                "Obtain senior management sign-off",
                "Senior management or the board approves the use of the model and its risk materiality.",
                true,
            ),
            "mas_fairness_review",
        ),
        template(
            "mas_customer_disclosure",
            "Disclose AI use to customers",
            "Inform customers proactively where AI-driven decisions affect them.",
            false,
        ),
    ]
}
