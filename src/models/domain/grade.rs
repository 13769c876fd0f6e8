use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row in the grade ledger shared with the rest of the academic record.
///
/// This engine only ever creates quiz-derived rows; it never updates them.
/// Idempotency key: `(student_id, course_id, source_quiz_id)` — at most one
/// row per key, even under retried synthesis.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    /// None for quiz-derived grades.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    pub source_quiz_id: String,
    pub source_attempt_id: String,
    pub letter_grade: String,
    pub score: i32,
    pub max_points: i32,
    pub percentage: f64,
    pub graded_by_id: String,
    pub weight: f64,
    pub is_extra_credit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Grade {
    #[allow(clippy::too_many_arguments)]
    pub fn from_quiz_attempt(
        student_id: &str,
        course_id: &str,
        source_quiz_id: &str,
        source_attempt_id: &str,
        letter_grade: &str,
        score: i32,
        max_points: i32,
        percentage: f64,
        graded_by_id: &str,
    ) -> Self {
        Grade {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            assignment_id: None,
            source_quiz_id: source_quiz_id.to_string(),
            source_attempt_id: source_attempt_id.to_string(),
            letter_grade: letter_grade.to_string(),
            score,
            max_points,
            percentage,
            graded_by_id: graded_by_id.to_string(),
            weight: 1.0,
            is_extra_credit: false,
            created_at: Some(Utc::now()),
        }
    }
}
