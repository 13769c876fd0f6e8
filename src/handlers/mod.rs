pub mod attempt_handler;
pub mod health_handler;
pub mod quiz_handler;

pub use attempt_handler::{get_attempt, list_attempts, start_attempt, submit_attempt};
pub use health_handler::health_check;
pub use quiz_handler::{create_quiz, delete_quiz, get_quiz, list_course_quizzes, update_quiz};
