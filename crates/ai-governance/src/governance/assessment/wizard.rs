use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Answer, AssessmentMode, AssessmentSubmission, FormValues, Question, Section};
use super::registry::QuestionRegistry;
use super::schema::{AssessmentSchema, ValidationErrors};

/// One wizard step: a section and the ids of the questions it shows.
#[derive(Debug, Clone, Serialize)]
pub struct WizardPage {
    pub section: Section,
    pub question_ids: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("question '{0}' is not part of this questionnaire")]
    UnknownQuestion(String),
    #[error("question '{id}' is not asked in {mode} mode")]
    InactiveQuestion { id: String, mode: AssessmentMode },
    #[error("page {page} does not exist ({pages} pages)")]
    PageOutOfRange { page: usize, pages: usize },
    #[error("page {0} cannot be opened before the pages leading to it are completed")]
    PageLocked(usize),
    #[error("already on the last page")]
    LastPage,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Multi-page questionnaire state: the current page, answers, touched fields
/// and per-field errors.
#[derive(Debug, Clone)]
pub struct AssessmentWizard {
    registry: QuestionRegistry,
    mode: AssessmentMode,
    schema: AssessmentSchema,
    pages: Vec<WizardPage>,
    current_page: usize,
    values: FormValues,
    touched: BTreeSet<String>,
    errors: ValidationErrors,
    completed: BTreeSet<usize>,
}

impl AssessmentWizard {
    pub fn new(registry: QuestionRegistry, mode: AssessmentMode) -> Self {
        Self::resume(registry, mode, FormValues::new())
    }

    /// Start from previously saved answers, e.g. a restored draft.
    pub fn resume(registry: QuestionRegistry, mode: AssessmentMode, values: FormValues) -> Self {
        Self {
            registry,
            mode,
            schema: registry.schema_for_mode(mode),
            pages: build_pages(&registry, mode),
            current_page: 0,
            values,
            touched: BTreeSet::new(),
            errors: ValidationErrors::default(),
            completed: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> AssessmentMode {
        self.mode
    }

    /// Switch depth. Pages are rebuilt from the new question set and the
    /// wizard returns to the first page; answers are kept.
    pub fn set_mode(&mut self, mode: AssessmentMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.schema = self.registry.schema_for_mode(mode);
        self.pages = build_pages(&self.registry, mode);
        self.current_page = 0;
        self.errors = ValidationErrors::default();
        self.completed.clear();
    }

    pub fn pages(&self) -> &[WizardPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.pages.len()
    }

    pub fn is_completed(&self, page: usize) -> bool {
        self.completed.contains(&page)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id)
    }

    pub fn is_touched(&self, id: &str) -> bool {
        self.touched.contains(id)
    }

    /// Questions rendered on `page`, after applying display conditions.
    pub fn visible_questions(&self, page: usize) -> Vec<&'static Question> {
        self.pages
            .get(page)
            .map(|page| {
                page.question_ids
                    .iter()
                    .filter_map(|id| self.registry.question(id))
                    .filter(|question| question.is_visible(&self.values))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn current_questions(&self) -> Vec<&'static Question> {
        self.visible_questions(self.current_page)
    }

    pub fn set_value(&mut self, id: &str, answer: Answer) -> Result<(), WizardError> {
        if self.registry.question(id).is_none() {
            return Err(WizardError::UnknownQuestion(id.to_string()));
        }
        if !self.registry.is_active(id, self.mode) {
            return Err(WizardError::InactiveQuestion {
                id: id.to_string(),
                mode: self.mode,
            });
        }

        self.values.set(id, answer);
        self.touched.insert(id.to_string());
        self.errors.remove(id);
        Ok(())
    }

    pub fn clear_value(&mut self, id: &str) -> Option<Answer> {
        self.touched.insert(id.to_string());
        self.values.remove(id)
    }

    /// Validate the current page and advance. On failure the wizard stays put
    /// and only the offending fields on this page are flagged.
    pub fn next(&mut self) -> Result<usize, WizardError> {
        if self.is_last_page() {
            return Err(WizardError::LastPage);
        }

        self.validate_page(self.current_page)?;
        self.completed.insert(self.current_page);
        self.current_page += 1;
        Ok(self.current_page)
    }

    pub fn back(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1);
        self.current_page
    }

    /// Step-indicator navigation: any earlier or completed page, or the
    /// next page (which validates like [`next`](Self::next)).
    pub fn go_to(&mut self, page: usize) -> Result<usize, WizardError> {
        if page >= self.pages.len() {
            return Err(WizardError::PageOutOfRange {
                page,
                pages: self.pages.len(),
            });
        }

        if page == self.current_page + 1 {
            return self.next();
        }

        if page <= self.current_page || self.completed.contains(&page) {
            self.current_page = page;
            return Ok(page);
        }

        Err(WizardError::PageLocked(page))
    }

    /// Validate every active field. Failures keep the wizard on its current
    /// page; success yields only the answers that apply to this mode.
    pub fn submit(&mut self) -> Result<AssessmentSubmission, WizardError> {
        match self.schema.validate(&self.values) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Ok(AssessmentSubmission {
                    regulation: self.registry.regulation(),
                    mode: self.mode,
                    values: self.schema.retain_active(&self.values),
                })
            }
            Err(errors) => {
                for field in errors.fields() {
                    self.touched.insert(field.to_string());
                }
                self.errors = errors.clone();
                Err(WizardError::Validation(errors))
            }
        }
    }

    fn validate_page(&mut self, page: usize) -> Result<(), ValidationErrors> {
        let fields: Vec<&str> = self
            .pages
            .get(page)
            .map(|page| page.question_ids.clone())
            .unwrap_or_default();

        for field in &fields {
            self.errors.remove(field);
        }

        self.schema
            .validate_fields(&self.values, &fields)
            .map_err(|errors| {
                for (field, message) in errors.iter() {
                    self.touched.insert(field.to_string());
                    self.errors.insert(field, message);
                }
                errors
            })
    }
}

fn build_pages(registry: &QuestionRegistry, mode: AssessmentMode) -> Vec<WizardPage> {
    registry
        .sections_with_questions(mode)
        .into_iter()
        .map(|group| WizardPage {
            section: group.section,
            question_ids: group.questions.iter().map(|question| question.id).collect(),
        })
        .collect()
}
