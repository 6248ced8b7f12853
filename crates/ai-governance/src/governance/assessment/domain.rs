use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::governance::regulation::Regulation;

/// Depth of a questionnaire session. Rapid asks a fixed subset of the
/// comprehensive question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMode {
    #[default]
    Rapid,
    Comprehensive,
}

impl AssessmentMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rapid => "rapid",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for AssessmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assessment mode '{0}' (expected rapid or comprehensive)")]
pub struct UnknownMode(pub String);

impl FromStr for AssessmentMode {
    type Err = UnknownMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rapid" | "quick" => Ok(Self::Rapid),
            "comprehensive" | "full" => Ok(Self::Comprehensive),
            _ => Err(UnknownMode(value.to_string())),
        }
    }
}

/// Input widget a question is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Radio,
    Checkbox,
    Textarea,
}

impl QuestionKind {
    pub const fn is_free_text(self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// Show a question only when another question holds a specific answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayCondition {
    pub depends_on: &'static str,
    pub equals: &'static str,
}

impl DisplayCondition {
    pub fn is_met(&self, values: &FormValues) -> bool {
        values
            .get(self.depends_on)
            .is_some_and(|answer| answer.matches(self.equals))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<DisplayCondition>,
    pub priority: Priority,
    pub required: bool,
    pub section: &'static str,
}

impl Question {
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.condition
            .map_or(true, |condition| condition.is_met(values))
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
}

/// A single answer. Untagged so `"yes"`, `["a", "b"]` and `true` all decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Text(String),
    Choices(Vec<String>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Flag(_) => false,
            Self::Text(value) => value.trim().is_empty(),
            Self::Choices(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }

    pub fn matches(&self, expected: &str) -> bool {
        match self {
            Self::Flag(flag) => {
                let truthy = matches!(expected, "yes" | "true");
                *flag == truthy
            }
            Self::Text(value) => value.trim() == expected,
            Self::Choices(values) => values.iter().any(|value| value == expected),
        }
    }
}

/// Question id to answer map, mutated by the wizard and snapshotted by autosave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Answer>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.0.get(question_id)
    }

    pub fn set(&mut self, question_id: impl Into<String>, answer: Answer) -> Option<Answer> {
        self.0.insert(question_id.into(), answer)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<Answer> {
        self.0.remove(question_id)
    }

    pub fn with(mut self, question_id: impl Into<String>, answer: Answer) -> Self {
        self.set(question_id, answer);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Answer)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Answer) -> bool,
    {
        self.0.retain(|id, answer| keep(id, answer));
    }
}

impl FromIterator<(String, Answer)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (String, Answer)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validated answers ready to hand to the assessment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub regulation: Regulation,
    pub mode: AssessmentMode,
    pub values: FormValues,
}
