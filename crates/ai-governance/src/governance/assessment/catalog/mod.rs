//! Static questionnaire definitions, one catalog per regulation.
//!
//! Catalogs are built once and shared for the lifetime of the process; every
//! registry call hands out references into them.

mod eu;
mod mas;
mod uk;

use std::sync::OnceLock;

use super::domain::{DisplayCondition, Priority, Question, QuestionKind, QuestionOption, Section};
use crate::governance::regulation::Regulation;

/// Questions, section order and rapid subset for one regulation.
#[derive(Debug)]
pub struct Catalog {
    pub regulation: Regulation,
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,
    pub rapid_ids: &'static [&'static str],
}

impl Catalog {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn is_rapid(&self, id: &str) -> bool {
        self.rapid_ids.contains(&id)
    }
}

pub fn catalog(regulation: Regulation) -> &'static Catalog {
    static EU: OnceLock<Catalog> = OnceLock::new();
    static UK: OnceLock<Catalog> = OnceLock::new();
    static MAS: OnceLock<Catalog> = OnceLock::new();

    match regulation {
        Regulation::EuAiAct => EU.get_or_init(eu::catalog),
        Regulation::UkAiFramework => UK.get_or_init(uk::catalog),
        Regulation::Mas => MAS.get_or_init(mas::catalog),
    }
}

fn question(
    id: &'static str,
    section: &'static str,
    kind: QuestionKind,
    priority: Priority,
    title: &'static str,
) -> Question {
    Question {
        id,
        title,
        description: None,
        kind,
        options: Vec::new(),
        condition: None,
        priority,
        required: true,
        section,
    }
}

impl Question {
    fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn shown_when(mut self, depends_on: &'static str, equals: &'static str) -> Self {
        self.condition = Some(DisplayCondition { depends_on, equals });
        self
    }
}

fn option(value: &'static str, label: &'static str) -> QuestionOption {
    QuestionOption {
        value,
        label,
        description: None,
    }
}

fn detailed(
    value: &'static str,
    label: &'static str,
    description: &'static str,
) -> QuestionOption {
    QuestionOption {
        value,
        label,
        description: Some(description),
    }
}

fn yes_no() -> Vec<QuestionOption> {
    vec![option("yes", "Yes"), option("no", "No")]
}

fn yes_partial_no() -> Vec<QuestionOption> {
    vec![
        option("yes", "Yes"),
        option("partial", "Partially"),
        option("no", "No"),
    ]
}

fn section(id: &'static str, title: &'static str) -> Section {
    Section { id, title }
}
