use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::policy,
    collaborators::{CourseDirectory, EnrollmentOracle, IdentityDirectory},
    errors::{AppError, AppResult},
    models::{
        domain::{CourseOwnership, Question, Quiz, Role},
        dto::{
            request::{CreateQuizRequest, QuizDefinitionRequest},
            response::QuizView,
        },
    },
    repositories::QuizRepository,
    services::{duration, student_view},
};

/// The quiz catalog: owns quiz definitions, read-mostly after creation.
pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    courses: Arc<dyn CourseDirectory>,
    identity: Arc<dyn IdentityDirectory>,
    enrollment: Arc<dyn EnrollmentOracle>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        courses: Arc<dyn CourseDirectory>,
        identity: Arc<dyn IdentityDirectory>,
        enrollment: Arc<dyn EnrollmentOracle>,
    ) -> Self {
        Self {
            quizzes,
            courses,
            identity,
            enrollment,
        }
    }

    pub async fn create_quiz(
        &self,
        request: CreateQuizRequest,
        caller_id: &str,
    ) -> AppResult<Quiz> {
        request.validate()?;

        self.authorize_manage(caller_id, &request.course_id, None)
            .await?;

        let definition = request.definition;
        let questions = build_questions(&definition)?;

        let quiz = Quiz::new(
            &request.course_id,
            caller_id,
            &definition.title,
            definition.description,
            definition.duration_spec,
            definition.is_timed,
            definition.attempts_allowed,
            definition.due_date,
            questions,
        );

        self.quizzes.create(quiz).await
    }

    pub async fn get_quiz(&self, id: &str, caller_id: &str) -> AppResult<QuizView> {
        let quiz = self.load_quiz(id).await?;
        let role = self.identity.get_role(caller_id).await?;

        if role == Role::Student {
            self.require_enrolled(caller_id, &quiz.course_id).await?;
            return Ok(QuizView::Student(student_view::project_quiz(&quiz)));
        }

        Ok(QuizView::Full(quiz))
    }

    /// Full replace of the quiz definition: the question set is swapped
    /// wholesale, never diffed, and the derived totals follow automatically.
    pub async fn update_quiz(
        &self,
        id: &str,
        definition: QuizDefinitionRequest,
        caller_id: &str,
    ) -> AppResult<Quiz> {
        definition.validate()?;

        let mut quiz = self.load_quiz(id).await?;
        self.authorize_manage(caller_id, &quiz.course_id, Some(&quiz.created_by_id))
            .await?;

        let questions = build_questions(&definition)?;

        quiz.title = definition.title;
        quiz.description = definition.description;
        quiz.duration_spec = definition.duration_spec;
        quiz.is_timed = definition.is_timed;
        quiz.attempts_allowed = definition.attempts_allowed;
        quiz.due_date = definition.due_date;
        quiz.questions = questions;
        quiz.modified_at = Some(Utc::now());

        self.quizzes.update(quiz).await
    }

    pub async fn delete_quiz(&self, id: &str, caller_id: &str) -> AppResult<()> {
        let quiz = self.load_quiz(id).await?;
        self.authorize_manage(caller_id, &quiz.course_id, Some(&quiz.created_by_id))
            .await?;

        self.quizzes.delete(id).await?;
        Ok(())
    }

    pub async fn list_quizzes_for_course(
        &self,
        course_id: &str,
        caller_id: &str,
    ) -> AppResult<Vec<QuizView>> {
        let role = self.identity.get_role(caller_id).await?;

        if role == Role::Student {
            self.require_enrolled(caller_id, course_id).await?;
            let quizzes = self.quizzes.list_by_course(course_id).await?;
            return Ok(quizzes
                .iter()
                .map(|q| QuizView::Student(student_view::project_quiz(q)))
                .collect());
        }

        let quizzes = self.quizzes.list_by_course(course_id).await?;
        Ok(quizzes.into_iter().map(QuizView::Full).collect())
    }

    async fn load_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    async fn load_ownership(&self, course_id: &str) -> AppResult<CourseOwnership> {
        self.courses
            .get_course_ownership(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))
    }

    async fn authorize_manage(
        &self,
        caller_id: &str,
        course_id: &str,
        quiz_creator: Option<&str>,
    ) -> AppResult<()> {
        let ownership = self.load_ownership(course_id).await?;
        let role = self.identity.get_role(caller_id).await?;

        if !policy::can_manage_quiz(caller_id, role, &ownership, quiz_creator) {
            return Err(AppError::Forbidden(
                "Only the course instructor, the quiz creator, or a supervisor can manage quizzes"
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn require_enrolled(&self, student_id: &str, course_id: &str) -> AppResult<()> {
        if !self
            .enrollment
            .is_actively_enrolled(student_id, course_id)
            .await?
        {
            return Err(AppError::Forbidden("not enrolled".to_string()));
        }
        Ok(())
    }
}

/// Validate and materialize the question set from a definition. Every
/// question's answer key must point at one of its own options, and a timed
/// quiz must carry a parseable duration spec.
fn build_questions(definition: &QuizDefinitionRequest) -> AppResult<Vec<Question>> {
    if definition.is_timed {
        let spec = definition.duration_spec.as_deref().ok_or_else(|| {
            AppError::ValidationError("A timed quiz requires a duration spec".to_string())
        })?;
        duration::parse_duration(spec)?;
    }

    definition
        .questions
        .iter()
        .map(|input| {
            let option_count = input.options.len() as i64;
            if input.correct_option_index < 0 || input.correct_option_index >= option_count {
                return Err(AppError::ValidationError(format!(
                    "Correct option index {} is out of range for a question with {} options",
                    input.correct_option_index, option_count
                )));
            }
            Ok(input.clone().into_question())
        })
        .collect()
}
