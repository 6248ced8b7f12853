use serde::Serialize;

use super::catalog::{catalog, Catalog};
use super::domain::{AssessmentMode, Question, Section};
use super::schema::AssessmentSchema;
use crate::governance::regulation::Regulation;

/// Read-only view over one regulation's questionnaire.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRegistry {
    catalog: &'static Catalog,
}

/// A section together with the questions the active mode asks in it.
#[derive(Debug, Clone, Serialize)]
pub struct SectionQuestions {
    pub section: Section,
    pub questions: Vec<&'static Question>,
}

impl QuestionRegistry {
    pub fn for_regulation(regulation: Regulation) -> Self {
        Self {
            catalog: catalog(regulation),
        }
    }

    pub fn regulation(&self) -> Regulation {
        self.catalog.regulation
    }

    pub fn question(&self, id: &str) -> Option<&'static Question> {
        self.catalog.question(id)
    }

    pub fn rapid_ids(&self) -> &'static [&'static str] {
        self.catalog.rapid_ids
    }

    /// Whether `id` belongs to the question set asked in `mode`.
    pub fn is_active(&self, id: &str, mode: AssessmentMode) -> bool {
        match mode {
            AssessmentMode::Comprehensive => self.catalog.question(id).is_some(),
            AssessmentMode::Rapid => self.catalog.is_rapid(id),
        }
    }

    /// Questions asked in `mode`, in catalog order.
    pub fn questions_for_mode(&self, mode: AssessmentMode) -> Vec<&'static Question> {
        let catalog = self.catalog;
        catalog
            .questions
            .iter()
            .filter(|question| match mode {
                AssessmentMode::Comprehensive => true,
                AssessmentMode::Rapid => catalog.is_rapid(question.id),
            })
            .collect()
    }

    /// Group the mode's questions by section in the catalog's fixed section
    /// order. Sections with no questions in this mode are left out.
    pub fn sections_with_questions(&self, mode: AssessmentMode) -> Vec<SectionQuestions> {
        let questions = self.questions_for_mode(mode);

        self.catalog
            .sections
            .iter()
            .filter_map(|section| {
                let in_section: Vec<&'static Question> = questions
                    .iter()
                    .copied()
                    .filter(|question| question.section == section.id)
                    .collect();

                if in_section.is_empty() {
                    None
                } else {
                    Some(SectionQuestions {
                        section: *section,
                        questions: in_section,
                    })
                }
            })
            .collect()
    }

    pub fn schema_for_mode(&self, mode: AssessmentMode) -> AssessmentSchema {
        AssessmentSchema::for_mode(self.catalog, mode)
    }
}
