pub mod attempt_locks;
pub mod attempt_service;
pub mod duration;
pub mod grade_service;
pub mod quiz_service;
pub mod scoring;
pub mod student_view;

pub use attempt_locks::AttemptLocks;
pub use attempt_service::AttemptService;
pub use grade_service::GradeService;
pub use quiz_service::QuizService;
