use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Full replace of the stored quiz document.
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    /// Returns true if a quiz was deleted.
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Quiz>>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(IndexOptions::builder().name("course_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(course_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection
            .replace_one(doc! { "id": &quiz.id }, &quiz)
            .await?;
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "course_id": course_id })
            .sort(doc! { "due_date": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }
}
