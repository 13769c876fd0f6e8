use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Attempt, QuestionResult, Quiz};

/// Answer-key-free view of a question: `correct_option_index` and
/// `explanation` do not exist on this type, so they cannot leak.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentQuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub points: i32,
}

/// The projection served to the student being assessed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentQuizView {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_spec: Option<String>,
    pub is_timed: bool,
    pub attempts_allowed: i32,
    pub due_date: DateTime<Utc>,
    pub total_questions: usize,
    pub max_points: i32,
    pub questions: Vec<StudentQuestionView>,
}

/// Role-dependent read of a quiz: staff get the full definition including
/// answer keys, students get the sanitized projection.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum QuizView {
    Full(Quiz),
    Student(StudentQuizView),
}

#[derive(Clone, Debug, Serialize)]
pub struct StartAttemptResponse {
    pub attempt: Attempt,
    pub quiz: StudentQuizView,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScoreResult {
    pub score: i32,
    pub max_points: i32,
    pub per_question_results: Vec<QuestionResult>,
}
