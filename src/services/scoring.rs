//! Pure scoring: no I/O, deterministic, side-effect-free. Used for
//! automatic grading on submission and for any what-if re-scoring.

use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionResult};

/// Reject answer payloads that reference question ids the quiz does not
/// have. Unanswered questions are fine; unknown ones are a caller bug.
pub fn ensure_known_questions(
    questions: &[Question],
    answers: &HashMap<String, i64>,
) -> AppResult<()> {
    for question_id in answers.keys() {
        if !questions.iter().any(|q| &q.id == question_id) {
            return Err(AppError::ValidationError(format!(
                "Unknown question id '{}'",
                question_id
            )));
        }
    }
    Ok(())
}

/// Score submitted answers against the question set, one result per
/// question in quiz order. An unanswered question scores 0 and is not an
/// error. The total is always within `[0, sum(points)]`.
pub fn score_answers(
    questions: &[Question],
    answers: &HashMap<String, i64>,
) -> (Vec<QuestionResult>, i32) {
    let mut results = Vec::with_capacity(questions.len());
    let mut score = 0;

    for question in questions {
        let selected = answers.get(&question.id).copied();
        let is_correct = selected == Some(question.correct_option_index);
        let points_earned = if is_correct { question.points } else { 0 };
        score += points_earned;

        results.push(QuestionResult {
            question_id: question.id.clone(),
            selected_index: selected,
            correct_index: question.correct_option_index,
            is_correct,
            points_earned,
            explanation: question.explanation.clone(),
        });
    }

    (results, score)
}
