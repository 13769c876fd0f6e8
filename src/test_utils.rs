use chrono::{Duration, Utc};

use crate::models::domain::{Question, Quiz};

pub mod fixtures {
    use super::*;

    /// A two-question untimed quiz worth 15 points, due in a week.
    pub fn test_quiz() -> Quiz {
        Quiz::new(
            "course-1",
            "teacher-1",
            "Midterm",
            Some("Covers chapters 1-3".to_string()),
            None,
            false,
            2,
            Utc::now() + Duration::days(7),
            vec![
                Question::new(
                    "What is 2 + 2?",
                    vec!["3".into(), "4".into(), "5".into()],
                    1,
                    10,
                    Some("Basic arithmetic".to_string()),
                ),
                Question::new("Is water wet?", vec!["yes".into(), "no".into()], 0, 5, None),
            ],
        )
    }

    /// Same quiz with a time limit attached.
    pub fn test_timed_quiz(duration_spec: &str) -> Quiz {
        let mut quiz = test_quiz();
        quiz.is_timed = true;
        quiz.duration_spec = Some(duration_spec.to_string());
        quiz
    }

    pub fn test_question(points: i32) -> Question {
        Question::new(
            "Pick the first option",
            vec!["first".into(), "second".into()],
            0,
            points,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_quiz_fixture_totals() {
        let quiz = test_quiz();
        assert_eq!(quiz.total_questions(), 2);
        assert_eq!(quiz.max_points(), 15);
        assert!(!quiz.is_timed);
    }

    #[test]
    fn timed_quiz_fixture_carries_spec() {
        let quiz = test_timed_quiz("10 minutes");
        assert!(quiz.is_timed);
        assert_eq!(quiz.duration_spec.as_deref(), Some("10 minutes"));
    }
}
