use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

/// An assessment definition owned by a course. Immutable after creation
/// except via full replace of its definition (`update_quiz`).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub course_id: String,
    pub created_by_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form duration text such as "60 minutes" or "1 hour";
    /// normalized by `services::duration::parse_duration`.
    pub duration_spec: Option<String>,
    pub is_timed: bool,
    pub attempts_allowed: i32,
    pub due_date: DateTime<Utc>,
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        course_id: &str,
        created_by_id: &str,
        title: &str,
        description: Option<String>,
        duration_spec: Option<String>,
        is_timed: bool,
        attempts_allowed: i32,
        due_date: DateTime<Utc>,
        questions: Vec<Question>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            created_by_id: created_by_id.to_string(),
            title: title.to_string(),
            description,
            duration_spec,
            is_timed,
            attempts_allowed,
            due_date,
            questions,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Always derived from `questions`, never stored separately.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Always derived from `questions`, never stored separately.
    pub fn max_points(&self) -> i32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}
