//! The single projection used everywhere a quiz is served to the student
//! being assessed. Staff reads bypass it and get the full `Quiz`.

use crate::models::domain::Quiz;
use crate::models::dto::response::{StudentQuestionView, StudentQuizView};

pub fn project_quiz(quiz: &Quiz) -> StudentQuizView {
    StudentQuizView {
        id: quiz.id.clone(),
        course_id: quiz.course_id.clone(),
        title: quiz.title.clone(),
        description: quiz.description.clone(),
        duration_spec: quiz.duration_spec.clone(),
        is_timed: quiz.is_timed,
        attempts_allowed: quiz.attempts_allowed,
        due_date: quiz.due_date,
        total_questions: quiz.total_questions(),
        max_points: quiz.max_points(),
        questions: quiz
            .questions
            .iter()
            .map(|q| StudentQuestionView {
                id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
                points: q.points,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Question;
    use chrono::{Duration, Utc};

    fn quiz_with_keys() -> Quiz {
        Quiz::new(
            "course-1",
            "teacher-1",
            "Final",
            Some("covers everything".to_string()),
            Some("1 hour".to_string()),
            true,
            1,
            Utc::now() + Duration::days(1),
            vec![
                Question::new(
                    "Q1",
                    vec!["a".into(), "b".into(), "c".into()],
                    2,
                    10,
                    Some("because c".to_string()),
                ),
                Question::new("Q2", vec!["x".into(), "y".into()], 0, 5, None),
            ],
        )
    }

    #[test]
    fn projection_keeps_ids_text_options_points() {
        let quiz = quiz_with_keys();
        let view = project_quiz(&quiz);

        assert_eq!(view.questions.len(), 2);
        assert_eq!(view.questions[0].id, quiz.questions[0].id);
        assert_eq!(view.questions[0].options.len(), 3);
        assert_eq!(view.questions[0].points, 10);
        assert_eq!(view.total_questions, 2);
        assert_eq!(view.max_points, 15);
    }

    #[test]
    fn serialized_projection_never_contains_key_material() {
        let quiz = quiz_with_keys();
        let view = project_quiz(&quiz);

        let json = serde_json::to_string(&view).expect("view should serialize");
        assert!(!json.contains("correct_option_index"));
        assert!(!json.contains("explanation"));
        assert!(!json.contains("because c"));
    }
}
