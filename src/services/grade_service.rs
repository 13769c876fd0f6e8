use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Attempt, Grade, Quiz},
    repositories::GradeRepository,
};

/// Fixed percentage-to-letter scale shared with the rest of the academic
/// record system.
pub fn letter_grade(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 93.0 => "A",
        p if p >= 90.0 => "A-",
        p if p >= 87.0 => "B+",
        p if p >= 83.0 => "B",
        p if p >= 80.0 => "B-",
        p if p >= 77.0 => "C+",
        p if p >= 73.0 => "C",
        p if p >= 70.0 => "C-",
        p if p >= 67.0 => "D+",
        p if p >= 63.0 => "D",
        p if p >= 60.0 => "D-",
        _ => "F",
    }
}

/// Converts a closed attempt into exactly one grade-ledger row.
pub struct GradeService {
    grades: Arc<dyn GradeRepository>,
}

impl GradeService {
    pub fn new(grades: Arc<dyn GradeRepository>) -> Self {
        Self { grades }
    }

    /// Find-or-create by the idempotency key `(student, course, quiz)`.
    ///
    /// Safe to call repeatedly for the same closed attempt: an existing row
    /// is returned unchanged, and a duplicate-key race on insert resolves by
    /// re-reading the winner. Callers retry on `Unavailable`-class failures
    /// with the same key; scoring is never re-run here.
    pub async fn synthesize_grade(&self, attempt: &Attempt, quiz: &Quiz) -> AppResult<Grade> {
        if !attempt.is_closed() {
            return Err(AppError::Conflict(
                "Cannot grade an attempt that has not been submitted".to_string(),
            ));
        }

        let score = attempt.score.ok_or_else(|| {
            AppError::InternalError(format!("Closed attempt '{}' has no score", attempt.id))
        })?;
        let max_points = attempt.max_points_at_submission.ok_or_else(|| {
            AppError::InternalError(format!(
                "Closed attempt '{}' has no max points snapshot",
                attempt.id
            ))
        })?;

        if let Some(existing) = self
            .grades
            .find_by_source(&attempt.student_id, &quiz.course_id, &quiz.id)
            .await?
        {
            return Ok(existing);
        }

        let percentage = if max_points == 0 {
            0.0
        } else {
            100.0 * f64::from(score) / f64::from(max_points)
        };

        let grade = Grade::from_quiz_attempt(
            &attempt.student_id,
            &quiz.course_id,
            &quiz.id,
            &attempt.id,
            letter_grade(percentage),
            score,
            max_points,
            percentage,
            &quiz.created_by_id,
        );

        match self.grades.create(grade).await {
            Ok(created) => Ok(created),
            // Lost a race with a concurrent retry; the winner's row is the
            // one and only row for this key.
            Err(AppError::AlreadyExists(_)) => self
                .grades
                .find_by_source(&attempt.student_id, &quiz.course_id, &quiz.id)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(
                        "Grade insert hit duplicate key but no row was found".to_string(),
                    )
                }),
            Err(e) => Err(e),
        }
    }
}
