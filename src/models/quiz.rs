use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the textual clues leading to a quiz's single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionHint {
    pub question: String,
}

impl QuestionHint {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// A quiz record as stored behind the API. Only `_id`, `title` and the
/// active flag are guaranteed; everything else tolerates absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub questions: Vec<QuestionHint>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// The shape posted to add-quiz and edit-quiz. `selID` targets an existing
/// record and is omitted entirely on creation, never sent as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    #[serde(rename = "selID", skip_serializing_if = "Option::is_none")]
    pub sel_id: Option<String>,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub questions: Vec<QuestionHint>,
    pub answer: String,
}
