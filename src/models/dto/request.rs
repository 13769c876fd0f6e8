use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Question;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,

    #[validate(length(min = 2, max = 26))]
    pub options: Vec<String>,

    pub correct_option_index: i64,

    #[validate(range(min = 0))]
    pub points: i32,

    pub explanation: Option<String>,
}

impl QuestionInput {
    pub fn into_question(self) -> Question {
        Question::new(
            &self.text,
            self.options,
            self.correct_option_index,
            self.points,
            self.explanation,
        )
    }
}

/// Full quiz definition, used both for create and for full-replace update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizDefinitionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub duration_spec: Option<String>,

    #[serde(default)]
    pub is_timed: bool,

    #[validate(range(min = 1))]
    pub attempts_allowed: i32,

    pub due_date: DateTime<Utc>,

    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1))]
    pub course_id: String,

    #[validate(nested)]
    #[serde(flatten)]
    pub definition: QuizDefinitionRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttemptRequest {
    /// question id -> selected option index
    pub answers: HashMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAttemptsQuery {
    pub student_id: Option<String>,
}
