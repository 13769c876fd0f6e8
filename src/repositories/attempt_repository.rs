use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Attempt,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Insert a new attempt. Returns `AlreadyExists` if an open attempt for
    /// the same (student, quiz) pair already exists — the storage-level
    /// backstop for the at-most-one-open-attempt invariant.
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>>;
    async fn find_open(&self, student_id: &str, quiz_id: &str) -> AppResult<Option<Attempt>>;
    /// Counts open and closed attempts alike.
    async fn count_for_student_and_quiz(&self, student_id: &str, quiz_id: &str)
        -> AppResult<usize>;
    /// Full replace of the stored attempt document.
    async fn update(&self, attempt: Attempt) -> AppResult<Attempt>;
    async fn list_for_quiz<'a>(
        &self,
        quiz_id: &str,
        student_id: Option<&'a str>,
    ) -> AppResult<Vec<Attempt>>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // At most one Open attempt per (student, quiz), enforced by the
        // storage layer even across processes.
        let open_attempt_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "state": "Open" })
                    .name("one_open_attempt_per_student_quiz".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1 })
            .options(IndexOptions::builder().name("quiz_student".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(open_attempt_index).await?;
        self.collection.create_index(quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Open attempt already exists for student '{}' on quiz '{}'",
                attempt.student_id, attempt.quiz_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Attempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_open(&self, student_id: &str, quiz_id: &str) -> AppResult<Option<Attempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "quiz_id": quiz_id,
                "state": "Open"
            })
            .await?;
        Ok(attempt)
    }

    async fn count_for_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<usize> {
        let count = self
            .collection
            .count_documents(doc! {
                "student_id": student_id,
                "quiz_id": quiz_id
            })
            .await?;
        Ok(count as usize)
    }

    async fn update(&self, attempt: Attempt) -> AppResult<Attempt> {
        self.collection
            .replace_one(doc! { "id": &attempt.id }, &attempt)
            .await?;
        Ok(attempt)
    }

    async fn list_for_quiz<'a>(
        &self,
        quiz_id: &str,
        student_id: Option<&'a str>,
    ) -> AppResult<Vec<Attempt>> {
        let mut filter = doc! { "quiz_id": quiz_id };
        if let Some(sid) = student_id {
            filter.insert("student_id", sid);
        }

        let attempts = self
            .collection
            .find(filter)
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }
}
