//! Mode-aware validation.
//!
//! Rapid and comprehensive validation share one rule table derived from the
//! catalog. Each rule declares when it applies (mode membership plus an
//! optional display condition), so the two modes cannot drift apart.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::catalog::Catalog;
use super::domain::{Answer, AssessmentMode, DisplayCondition, FormValues, Question, QuestionKind};

pub const MAX_TEXT_LENGTH: usize = 5_000;

/// When a field rule is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applicability {
    pub in_rapid: bool,
    pub condition: Option<DisplayCondition>,
}

impl Applicability {
    pub fn holds(&self, mode: AssessmentMode, values: &FormValues) -> bool {
        let in_mode = match mode {
            AssessmentMode::Rapid => self.in_rapid,
            AssessmentMode::Comprehensive => true,
        };
        in_mode && self.condition.map_or(true, |condition| condition.is_met(values))
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub question: &'static Question,
    pub applies: Applicability,
}

impl FieldRule {
    fn check(&self, answer: Option<&Answer>) -> Option<String> {
        let question = self.question;
        let answer = match answer {
            Some(answer) if !answer.is_blank() => answer,
            _ => {
                if !question.required {
                    return None;
                }
                return Some(match self.applies.condition {
                    Some(condition) => format!(
                        "This answer is required when {} is '{}'",
                        condition.depends_on, condition.equals
                    ),
                    None => "This question is required".to_string(),
                });
            }
        };

        match (question.kind, answer) {
            (QuestionKind::Text | QuestionKind::Textarea, Answer::Text(text)) => {
                if text.chars().count() > MAX_TEXT_LENGTH {
                    Some(format!(
                        "Answers are limited to {MAX_TEXT_LENGTH} characters"
                    ))
                } else {
                    None
                }
            }
            (QuestionKind::Text | QuestionKind::Textarea, _) => {
                Some("Expected a text answer".to_string())
            }
            (QuestionKind::Radio, Answer::Text(value)) => {
                if question.has_option(value.trim()) {
                    None
                } else {
                    Some("Select one of the listed options".to_string())
                }
            }
            (QuestionKind::Radio, Answer::Flag(flag)) => {
                let value = if *flag { "yes" } else { "no" };
                if question.has_option(value) {
                    None
                } else {
                    Some("Select one of the listed options".to_string())
                }
            }
            (QuestionKind::Radio, Answer::Choices(_)) => {
                Some("Select a single option".to_string())
            }
            (QuestionKind::Checkbox, Answer::Choices(values)) => values
                .iter()
                .find(|value| !question.has_option(value))
                .map(|unknown| format!("Unknown option '{unknown}'")),
            (QuestionKind::Checkbox, _) => Some("Select one or more options".to_string()),
        }
    }
}

/// Validator for one regulation and mode.
#[derive(Debug, Clone)]
pub struct AssessmentSchema {
    mode: AssessmentMode,
    rules: Vec<FieldRule>,
}

impl AssessmentSchema {
    pub fn for_mode(catalog: &'static Catalog, mode: AssessmentMode) -> Self {
        let rules = catalog
            .questions
            .iter()
            .map(|question| FieldRule {
                question,
                applies: Applicability {
                    in_rapid: catalog.is_rapid(question.id),
                    condition: question.condition,
                },
            })
            .collect();

        Self { mode, rules }
    }

    pub fn mode(&self) -> AssessmentMode {
        self.mode
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Ids of the fields this schema would currently enforce for `values`.
    pub fn active_fields(&self, values: &FormValues) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.applies.holds(self.mode, values))
            .map(|rule| rule.question.id)
            .collect()
    }

    /// Copy of `values` holding only answers to fields that currently apply.
    pub fn retain_active(&self, values: &FormValues) -> FormValues {
        let active = self.active_fields(values);
        let mut retained = values.clone();
        retained.retain(|id, _| active.iter().any(|field| *field == id));
        retained
    }

    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        self.validate_where(values, |_| true)
    }

    /// Validate only the listed fields, e.g. the questions on one wizard page.
    pub fn validate_fields(
        &self,
        values: &FormValues,
        fields: &[&str],
    ) -> Result<(), ValidationErrors> {
        self.validate_where(values, |id| fields.iter().any(|field| *field == id))
    }

    fn validate_where<F>(&self, values: &FormValues, include: F) -> Result<(), ValidationErrors>
    where
        F: Fn(&str) -> bool,
    {
        let mut errors = ValidationErrors::default();

        for rule in &self.rules {
            let id = rule.question.id;
            if !include(id) || !rule.applies.holds(self.mode, values) {
                continue;
            }
            if let Some(message) = rule.check(values.get(id)) {
                errors.insert(id, message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field id to message map produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields().collect::<Vec<_>>().join(", ");
        write!(f, "{} field(s) failed validation: {fields}", self.len())
    }
}

impl std::error::Error for ValidationErrors {}
