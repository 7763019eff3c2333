use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::raw::RawQuestionRecord;
use crate::model::session_label::SessionLabel;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A normalized multiple-choice question.
///
/// Options are in canonical (authored) order after blank slots have been
/// dropped; `correct_options`, `explanations` and `option_images` are indexed
/// against that filtered list. Values are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    image: Option<String>,
    options: Vec<String>,
    correct_options: Vec<usize>,
    explanations: Vec<String>,
    option_images: Vec<String>,
    overall_explanation: String,
    chapter_name: Option<String>,
    chapter_color: Option<String>,
    session: Option<SessionLabel>,
    confirmed: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionValidationError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question has no authored options")]
    NoOptions,

    #[error("question has no correct option")]
    NoCorrectOption,
}

impl Question {
    /// Normalize a raw five-slot record into a canonical question.
    ///
    /// Slots with blank text are dropped and the survivors re-indexed
    /// contiguously; correctness, explanations and images are re-derived
    /// against the filtered list, never against the original layout.
    ///
    /// # Errors
    ///
    /// Returns `QuestionValidationError` if the record has no text, no
    /// authored options, or no correct option among the authored ones.
    pub fn from_raw(
        id: QuestionId,
        raw: &RawQuestionRecord,
    ) -> Result<Self, QuestionValidationError> {
        let text = raw.question_text.trim();
        if text.is_empty() {
            return Err(QuestionValidationError::EmptyText);
        }

        let mut options = Vec::new();
        let mut correct_options = Vec::new();
        let mut explanations = Vec::new();
        let mut option_images = Vec::new();

        for slot in raw.choice_slots() {
            if !slot.is_authored() {
                continue;
            }
            if slot.is_correct {
                correct_options.push(options.len());
            }
            options.push(slot.text.to_string());
            explanations.push(slot.explanation.to_string());
            option_images.push(slot.image.to_string());
        }

        if options.is_empty() {
            return Err(QuestionValidationError::NoOptions);
        }
        if correct_options.is_empty() {
            return Err(QuestionValidationError::NoCorrectOption);
        }

        let session = match raw.year_asked.trim() {
            "" => None,
            label => Some(SessionLabel::new(label)),
        };
        let chapter_name = match raw.subtopic.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        Ok(Self {
            id,
            text: text.to_string(),
            image: raw.question_image.clone().filter(|s| !s.trim().is_empty()),
            options,
            correct_options,
            explanations,
            option_images,
            overall_explanation: raw.overall_explanation.clone(),
            chapter_name,
            chapter_color: raw.chapter_color.clone(),
            session,
            confirmed: raw.confirmed,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Canonical indices of the correct options, ascending and non-empty.
    #[must_use]
    pub fn correct_options(&self) -> &[usize] {
        &self.correct_options
    }

    #[must_use]
    pub fn is_correct_option(&self, canonical_index: usize) -> bool {
        self.correct_options.contains(&canonical_index)
    }

    #[must_use]
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    #[must_use]
    pub fn option_images(&self) -> &[String] {
        &self.option_images
    }

    #[must_use]
    pub fn overall_explanation(&self) -> &str {
        &self.overall_explanation
    }

    #[must_use]
    pub fn chapter_name(&self) -> Option<&str> {
        self.chapter_name.as_deref()
    }

    #[must_use]
    pub fn chapter_color(&self) -> Option<&str> {
        self.chapter_color.as_deref()
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionLabel> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Whether the question is presented with multi-select affordance.
    ///
    /// True when more than one option is correct, and also for any question
    /// with more than two options regardless of answer cardinality. Scoring
    /// is set equality either way; only the selection toggle differs.
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.correct_options.len() > 1 || self.options.len() > 2
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
