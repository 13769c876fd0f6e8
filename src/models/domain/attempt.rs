use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One student's instance of taking a quiz.
///
/// Transitions `Open -> Closed` exactly once; `Closed` is terminal and the
/// attempt is immutable from then on. Invariant: `state == Closed` iff
/// `submitted_at.is_some()`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub state: AttemptState,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// question id -> selected option index; meaningful once submitted.
    pub answers: HashMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_question_results: Option<Vec<QuestionResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Snapshot of the quiz's max points at submission time, so the recorded
    /// result stays stable if the quiz is edited later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points_at_submission: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum AttemptState {
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub selected_index: Option<i64>,
    pub correct_index: i64,
    pub is_correct: bool,
    pub points_earned: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Attempt {
    pub fn open(quiz_id: &str, student_id: &str) -> Self {
        Attempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            state: AttemptState::Open,
            started_at: Utc::now(),
            submitted_at: None,
            answers: HashMap::new(),
            per_question_results: None,
            score: None,
            max_points_at_submission: None,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == AttemptState::Closed
    }

    /// The commit point of the state machine. Consumes the answers and
    /// grading output and transitions the attempt to `Closed`.
    pub fn close(
        &mut self,
        answers: HashMap<String, i64>,
        per_question_results: Vec<QuestionResult>,
        score: i32,
        max_points_at_submission: i32,
    ) {
        let now = Utc::now();
        self.state = AttemptState::Closed;
        self.submitted_at = Some(now);
        self.answers = answers;
        self.per_question_results = Some(per_question_results);
        self.score = Some(score);
        self.max_points_at_submission = Some(max_points_at_submission);
        self.modified_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_attempt_starts_open_and_unscored() {
        let attempt = Attempt::open("quiz-1", "student-1");

        assert_eq!(attempt.state, AttemptState::Open);
        assert!(!attempt.is_closed());
        assert!(attempt.submitted_at.is_none());
        assert!(attempt.score.is_none());
        assert!(attempt.per_question_results.is_none());
    }

    #[test]
    fn close_sets_submitted_at_and_score() {
        let mut attempt = Attempt::open("quiz-1", "student-1");
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), 0);

        attempt.close(
            answers,
            vec![QuestionResult {
                question_id: "q1".to_string(),
                selected_index: Some(0),
                correct_index: 0,
                is_correct: true,
                points_earned: 10,
                explanation: None,
            }],
            10,
            15,
        );

        assert!(attempt.is_closed());
        assert!(attempt.submitted_at.is_some());
        assert_eq!(attempt.score, Some(10));
        assert_eq!(attempt.max_points_at_submission, Some(15));
        assert_eq!(attempt.per_question_results.as_ref().map(|r| r.len()), Some(1));
    }

    #[test]
    fn attempt_state_round_trip_serialization() {
        for state in [AttemptState::Open, AttemptState::Closed] {
            let json = serde_json::to_string(&state).expect("state should serialize");
            let parsed: AttemptState =
                serde_json::from_str(&json).expect("state should deserialize");
            assert_eq!(state, parsed);
        }
    }
}
