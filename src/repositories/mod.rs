pub mod attempt_repository;
pub mod grade_repository;
pub mod quiz_repository;

pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use grade_repository::{GradeRepository, MongoGradeRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};

/// A unique-index violation, used by the repositories to turn storage-level
/// constraint hits into `AppError::AlreadyExists`.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(&*err.kind, ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000)
}
