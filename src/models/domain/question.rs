use serde::{Deserialize, Serialize};

/// A single multiple-choice question, including its answer key.
///
/// The answer key (`correct_option_index`) and `explanation` must never
/// reach a student mid-attempt; student-facing reads go through
/// `services::student_view` which strips both fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: i64,
    pub points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(
        text: &str,
        options: Vec<String>,
        correct_option_index: i64,
        points: i32,
        explanation: Option<String>,
    ) -> Self {
        Question {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            options,
            correct_option_index,
            points,
            explanation,
        }
    }
}
