use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::policy,
    collaborators::{CourseDirectory, EnrollmentOracle, IdentityDirectory},
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, Quiz},
        dto::response::{ScoreResult, StartAttemptResponse},
    },
    repositories::{AttemptRepository, QuizRepository},
    services::{duration, scoring, student_view, AttemptLocks, GradeService},
};

/// The attempt lifecycle manager: creates, resumes and closes attempts,
/// enforcing attempt-count and deadline policy.
///
/// State machine per (student, quiz): NotStarted -> Open -> Closed. All
/// mutating operations on one pair are serialized through `AttemptLocks`;
/// the repository's unique index backstops the same invariant across
/// processes.
pub struct AttemptService {
    attempts: Arc<dyn AttemptRepository>,
    quizzes: Arc<dyn QuizRepository>,
    grades: Arc<GradeService>,
    enrollment: Arc<dyn EnrollmentOracle>,
    courses: Arc<dyn CourseDirectory>,
    identity: Arc<dyn IdentityDirectory>,
    locks: AttemptLocks,
}

impl AttemptService {
    pub fn new(
        attempts: Arc<dyn AttemptRepository>,
        quizzes: Arc<dyn QuizRepository>,
        grades: Arc<GradeService>,
        enrollment: Arc<dyn EnrollmentOracle>,
        courses: Arc<dyn CourseDirectory>,
        identity: Arc<dyn IdentityDirectory>,
    ) -> Self {
        Self {
            attempts,
            quizzes,
            grades,
            enrollment,
            courses,
            identity,
            locks: AttemptLocks::new(),
        }
    }

    /// Start a new attempt, or resume the open one if it exists.
    ///
    /// Resume is idempotent and deliberately skips the deadline check: a
    /// student already mid-attempt is not cut off by a deadline that passed
    /// after they started.
    pub async fn start_attempt(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> AppResult<StartAttemptResponse> {
        let quiz = self.load_quiz(quiz_id).await?;

        if !self
            .enrollment
            .is_actively_enrolled(student_id, &quiz.course_id)
            .await?
        {
            return Err(AppError::Forbidden("not enrolled".to_string()));
        }

        let _guard = self.locks.lock(student_id, quiz_id).await;

        if let Some(open) = self.attempts.find_open(student_id, quiz_id).await? {
            log::debug!(
                "Resuming open attempt '{}' for student '{}' on quiz '{}'",
                open.id,
                student_id,
                quiz_id
            );
            return Ok(StartAttemptResponse {
                quiz: student_view::project_quiz(&quiz),
                attempt: open,
            });
        }

        if Utc::now() > quiz.due_date {
            return Err(AppError::Conflict("deadline passed".to_string()));
        }

        let taken = self
            .attempts
            .count_for_student_and_quiz(student_id, quiz_id)
            .await?;
        if taken >= quiz.attempts_allowed as usize {
            return Err(AppError::Conflict("max attempts exceeded".to_string()));
        }

        let attempt = self.attempts.create(Attempt::open(quiz_id, student_id)).await?;
        log::info!(
            "Started attempt '{}' for student '{}' on quiz '{}'",
            attempt.id,
            student_id,
            quiz_id
        );

        Ok(StartAttemptResponse {
            quiz: student_view::project_quiz(&quiz),
            attempt,
        })
    }

    /// Score and close an open attempt. Closing is the commit point; grade
    /// synthesis afterwards is best-effort and independently retryable, and
    /// its failure never rolls the closure back.
    pub async fn submit_attempt(
        &self,
        attempt_id: &str,
        student_id: &str,
        answers: HashMap<String, i64>,
    ) -> AppResult<ScoreResult> {
        let attempt = self.load_attempt(attempt_id).await?;
        if attempt.student_id != student_id {
            return Err(AppError::Forbidden(
                "Only the owning student can submit this attempt".to_string(),
            ));
        }

        let _guard = self.locks.lock(student_id, &attempt.quiz_id).await;

        // Re-read under the lock: a concurrent submit may have closed it.
        let mut attempt = self.load_attempt(attempt_id).await?;
        if attempt.is_closed() {
            return Err(AppError::Conflict("already submitted".to_string()));
        }

        let quiz = self.load_quiz(&attempt.quiz_id).await?;

        if quiz.is_timed {
            let limit = quiz
                .duration_spec
                .as_deref()
                .map(duration::parse_duration)
                .transpose()?
                .ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Timed quiz '{}' has no duration spec",
                        quiz.id
                    ))
                })?;

            let elapsed = Utc::now() - attempt.started_at;
            if elapsed > limit {
                // The attempt stays Open; any fresh policy decision about
                // late work happens outside this engine.
                return Err(AppError::Conflict("time limit exceeded".to_string()));
            }
        }

        scoring::ensure_known_questions(&quiz.questions, &answers)?;
        let (results, score) = scoring::score_answers(&quiz.questions, &answers);
        let max_points = quiz.max_points();

        attempt.close(answers, results.clone(), score, max_points);
        let attempt = self.attempts.update(attempt).await?;
        log::info!(
            "Closed attempt '{}' for student '{}' with score {}/{}",
            attempt.id,
            student_id,
            score,
            max_points
        );

        drop(_guard);

        if let Err(e) = self.grades.synthesize_grade(&attempt, &quiz).await {
            // The attempt is closed and scored; the ledger write is retried
            // under the same idempotency key.
            log::error!(
                "Grade synthesis failed for attempt '{}' and will need a retry: {}",
                attempt.id,
                e
            );
        }

        Ok(ScoreResult {
            score,
            max_points,
            per_question_results: results,
        })
    }

    /// Full attempt read, answer key included in the per-question results.
    /// Restricted to the owning student, the quiz creator, the course
    /// instructor, or a supervisor.
    pub async fn get_attempt(&self, attempt_id: &str, caller_id: &str) -> AppResult<Attempt> {
        let attempt = self.load_attempt(attempt_id).await?;

        if attempt.student_id == caller_id {
            return Ok(attempt);
        }

        let quiz = self.load_quiz(&attempt.quiz_id).await?;
        self.authorize_staff_view(caller_id, &quiz, &attempt.student_id)
            .await?;
        Ok(attempt)
    }

    pub async fn list_attempts(
        &self,
        quiz_id: &str,
        student_filter: Option<&str>,
        caller_id: &str,
    ) -> AppResult<Vec<Attempt>> {
        // A student may list their own attempts; anything wider is staff-only.
        if student_filter != Some(caller_id) {
            let quiz = self.load_quiz(quiz_id).await?;
            self.authorize_staff_view(caller_id, &quiz, "").await?;
        }

        self.attempts.list_for_quiz(quiz_id, student_filter).await
    }

    async fn authorize_staff_view(
        &self,
        caller_id: &str,
        quiz: &Quiz,
        attempt_student: &str,
    ) -> AppResult<()> {
        let role = self.identity.get_role(caller_id).await?;
        let ownership = self
            .courses
            .get_course_ownership(&quiz.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", quiz.course_id))
            })?;

        if !policy::can_view_full_attempt(
            caller_id,
            role,
            &ownership,
            &quiz.created_by_id,
            attempt_student,
        ) {
            return Err(AppError::Forbidden(
                "Not allowed to view attempts for this quiz".to_string(),
            ));
        }
        Ok(())
    }

    async fn load_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    async fn load_attempt(&self, attempt_id: &str) -> AppResult<Attempt> {
        self.attempts.find_by_id(attempt_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        MockCourseDirectory, MockEnrollmentOracle, MockIdentityDirectory,
    };
    use crate::models::domain::Question;
    use crate::repositories::attempt_repository::MockAttemptRepository;
    use crate::repositories::grade_repository::MockGradeRepository;
    use crate::repositories::quiz_repository::MockQuizRepository;
    use chrono::Duration;

    fn quiz(attempts_allowed: i32) -> Quiz {
        let mut quiz = Quiz::new(
            "course-1",
            "teacher-1",
            "Midterm",
            None,
            None,
            false,
            attempts_allowed,
            Utc::now() + Duration::days(1),
            vec![
                Question::new("Q1", vec!["a".into(), "b".into()], 0, 10, None),
                Question::new("Q2", vec!["a".into(), "b".into()], 1, 5, None),
            ],
        );
        quiz.id = "quiz-1".to_string();
        quiz
    }

    fn grade_service() -> Arc<GradeService> {
        let mut grades = MockGradeRepository::new();
        grades.expect_find_by_source().returning(|_, _, _| Ok(None));
        grades.expect_create().returning(Ok);
        Arc::new(GradeService::new(Arc::new(grades)))
    }

    fn enrolled() -> MockEnrollmentOracle {
        let mut oracle = MockEnrollmentOracle::new();
        oracle
            .expect_is_actively_enrolled()
            .returning(|_, _| Ok(true));
        oracle
    }

    fn service(
        attempts: MockAttemptRepository,
        quizzes: MockQuizRepository,
        enrollment: MockEnrollmentOracle,
    ) -> AttemptService {
        AttemptService::new(
            Arc::new(attempts),
            Arc::new(quizzes),
            grade_service(),
            Arc::new(enrollment),
            Arc::new(MockCourseDirectory::new()),
            Arc::new(MockIdentityDirectory::new()),
        )
    }

    #[tokio::test]
    async fn start_attempt_on_missing_quiz_is_not_found() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(MockAttemptRepository::new(), quizzes, enrolled());
        let result = svc.start_attempt("missing", "student-1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unenrolled_student_cannot_start() {
        let q = quiz(1);
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));
        let mut oracle = MockEnrollmentOracle::new();
        oracle
            .expect_is_actively_enrolled()
            .returning(|_, _| Ok(false));

        let svc = service(MockAttemptRepository::new(), quizzes, oracle);
        let result = svc.start_attempt("quiz-1", "student-1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn open_attempt_is_resumed_even_past_deadline() {
        let mut q = quiz(1);
        q.due_date = Utc::now() - Duration::hours(1);
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let open = Attempt::open("quiz-1", "student-1");
        let open_id = open.id.clone();
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_open()
            .returning(move |_, _| Ok(Some(open.clone())));
        attempts.expect_create().never();

        let svc = service(attempts, quizzes, enrolled());
        let response = svc.start_attempt("quiz-1", "student-1").await.unwrap();

        assert_eq!(response.attempt.id, open_id);
    }

    #[tokio::test]
    async fn fresh_start_past_deadline_is_conflict() {
        let mut q = quiz(1);
        q.due_date = Utc::now() - Duration::hours(1);
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let mut attempts = MockAttemptRepository::new();
        attempts.expect_find_open().returning(|_, _| Ok(None));

        let svc = service(attempts, quizzes, enrolled());
        let result = svc.start_attempt("quiz-1", "student-1").await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "deadline passed"),
            other => panic!("expected deadline conflict, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn attempt_budget_is_enforced() {
        let q = quiz(2);
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let mut attempts = MockAttemptRepository::new();
        attempts.expect_find_open().returning(|_, _| Ok(None));
        attempts
            .expect_count_for_student_and_quiz()
            .returning(|_, _| Ok(2));
        attempts.expect_create().never();

        let svc = service(attempts, quizzes, enrolled());
        let result = svc.start_attempt("quiz-1", "student-1").await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "max attempts exceeded"),
            other => panic!("expected attempts conflict, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn submit_by_non_owner_is_forbidden() {
        let open = Attempt::open("quiz-1", "student-1");
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(open.clone())));

        let svc = service(attempts, MockQuizRepository::new(), enrolled());
        let result = svc
            .submit_attempt("attempt-1", "student-2", HashMap::new())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn double_submit_is_conflict() {
        let mut closed = Attempt::open("quiz-1", "student-1");
        closed.close(HashMap::new(), vec![], 0, 15);
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(closed.clone())));

        let svc = service(attempts, MockQuizRepository::new(), enrolled());
        let result = svc
            .submit_attempt("attempt-1", "student-1", HashMap::new())
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "already submitted"),
            other => panic!("expected conflict, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn expired_timed_attempt_stays_open_and_unscored() {
        let mut q = quiz(1);
        q.is_timed = true;
        q.duration_spec = Some("10 minutes".to_string());
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let mut late = Attempt::open("quiz-1", "student-1");
        late.started_at = Utc::now() - Duration::minutes(11);
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(late.clone())));
        attempts.expect_update().never();

        let svc = service(attempts, quizzes, enrolled());
        let result = svc
            .submit_attempt("attempt-1", "student-1", HashMap::new())
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "time limit exceeded"),
            other => panic!("expected time limit conflict, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn unknown_question_id_fails_validation_before_closing() {
        let q = quiz(1);
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let open = Attempt::open("quiz-1", "student-1");
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(open.clone())));
        attempts.expect_update().never();

        let mut answers = HashMap::new();
        answers.insert("not-a-question".to_string(), 0);

        let svc = service(attempts, quizzes, enrolled());
        let result = svc.submit_attempt("attempt-1", "student-1", answers).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn successful_submit_scores_and_snapshots_max_points() {
        let q = quiz(1);
        let q1_id = q.questions[0].id.clone();
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(q.clone())));

        let open = Attempt::open("quiz-1", "student-1");
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(open.clone())));
        attempts.expect_update().returning(Ok);

        let mut answers = HashMap::new();
        answers.insert(q1_id, 0);

        let svc = service(attempts, quizzes, enrolled());
        let result = svc
            .submit_attempt("attempt-1", "student-1", answers)
            .await
            .unwrap();

        assert_eq!(result.score, 10);
        assert_eq!(result.max_points, 15);
        assert_eq!(result.per_question_results.len(), 2);
    }
}
