use serde::{Deserialize, Serialize};

/// A single answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A fully assembled multiple-choice question.
///
/// `id` is 1-based within its batch. `correct_answer_id` is a 0-based index
/// into `answers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub answers: Vec<Answer>,
    pub correct_answer_id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Question {
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.get(self.correct_answer_id)
    }
}
