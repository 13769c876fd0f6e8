use std::sync::Arc;

use crate::{
    collaborators::{MongoCourseDirectory, MongoEnrollmentOracle, MongoIdentityDirectory},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoAttemptRepository, MongoGradeRepository, MongoQuizRepository},
    services::{AttemptService, GradeService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<AttemptService>,
    pub grade_service: Arc<GradeService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;
        let grade_repository = Arc::new(MongoGradeRepository::new(&db));
        grade_repository.ensure_indexes().await?;

        let enrollment = Arc::new(MongoEnrollmentOracle::new(&db));
        let courses = Arc::new(MongoCourseDirectory::new(&db));
        let identity = Arc::new(MongoIdentityDirectory::new(&db));

        let grade_service = Arc::new(GradeService::new(grade_repository));
        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            courses.clone(),
            identity.clone(),
            enrollment.clone(),
        ));
        let attempt_service = Arc::new(AttemptService::new(
            attempt_repository,
            quiz_repository,
            grade_service.clone(),
            enrollment,
            courses,
            identity,
        ));

        Ok(Self {
            quiz_service,
            attempt_service,
            grade_service,
            db,
            config: Arc::new(config),
        })
    }
}
