use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Grade,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// Look up a grade by its idempotency key (student, course, quiz).
    async fn find_by_source(
        &self,
        student_id: &str,
        course_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<Grade>>;
    /// Append one ledger row. Returns `AlreadyExists` when the idempotency
    /// key already has a row.
    async fn create(&self, grade: Grade) -> AppResult<Grade>;
}

pub struct MongoGradeRepository {
    collection: Collection<Grade>,
}

impl MongoGradeRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("grades");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for grades collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // Exactly one quiz-derived row per (student, course, quiz): retried
        // synthesis resolves duplicate-key by re-reading the existing row.
        let source_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1, "source_quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("grade_idempotency_key".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(source_index).await?;

        Ok(())
    }
}

#[async_trait]
impl GradeRepository for MongoGradeRepository {
    async fn find_by_source(
        &self,
        student_id: &str,
        course_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<Grade>> {
        let grade = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "course_id": course_id,
                "source_quiz_id": quiz_id
            })
            .await?;
        Ok(grade)
    }

    async fn create(&self, grade: Grade) -> AppResult<Grade> {
        match self.collection.insert_one(&grade).await {
            Ok(_) => Ok(grade),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Grade already recorded for student '{}' on quiz '{}'",
                grade.student_id, grade.source_quiz_id
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
