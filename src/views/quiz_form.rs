use crate::models::quiz::{QuestionHint, Quiz, QuizPayload};

/// The form always presents exactly this many hint slots.
pub const QUESTION_SLOTS: usize = 5;

/// Validation failures, checked in declaration order; the first failing
/// rule wins. The `Display` text is shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required!")]
    TitleRequired,
    #[error("Correct answer is required!")]
    AnswerRequired,
    #[error("You must add exactly 5 question hints. Currently you have {0}/5 hints.")]
    NotEnoughHints(usize),
}

/// In-progress create/edit form for a quiz. Holds field values only; it
/// performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizForm {
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub answer: String,
    questions: [String; QUESTION_SLOTS],
}

impl QuizForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to defaults: everything empty, inactive, five empty slots.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy an existing record into the form. Records with fewer than five
    /// hints are padded with empty slots; hints beyond the fifth are not
    /// shown, and resubmitting will overwrite them on the server.
    pub fn load_for_edit(&mut self, quiz: &Quiz) {
        self.title = quiz.title.clone();
        self.description = quiz.description.clone().unwrap_or_default();
        self.is_active = quiz.is_active;
        self.answer = quiz.answer.clone();
        self.questions = Default::default();
        for (slot, hint) in self.questions.iter_mut().zip(&quiz.questions) {
            *slot = hint.question.clone();
        }
    }

    pub fn questions(&self) -> &[String; QUESTION_SLOTS] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    /// Update one slot by position; out-of-range indexes are ignored.
    pub fn set_question(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.questions.get_mut(index) {
            *slot = text.into();
        }
    }

    /// Number of slots with non-empty trimmed text.
    pub fn filled_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| !q.trim().is_empty())
            .count()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        if self.answer.trim().is_empty() {
            return Err(FormError::AnswerRequired);
        }
        let filled = self.filled_count();
        if filled < QUESTION_SLOTS {
            return Err(FormError::NotEnoughHints(filled));
        }
        Ok(())
    }

    /// Shape the outbound payload: empty slots are dropped, the answer is
    /// trimmed, and `selID` is present only when editing an existing record.
    pub fn build_payload(&self, editing: Option<&Quiz>) -> QuizPayload {
        QuizPayload {
            sel_id: editing.map(|quiz| quiz.id.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
            questions: self
                .questions
                .iter()
                .filter(|q| !q.trim().is_empty())
                .map(|q| QuestionHint::new(q.clone()))
                .collect(),
            answer: self.answer.trim().to_string(),
        }
    }
}
