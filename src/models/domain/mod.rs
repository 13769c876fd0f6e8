pub mod attempt;
pub mod course;
pub mod grade;
pub mod identity;
pub mod question;
pub mod quiz;

pub use attempt::{Attempt, AttemptState, QuestionResult};
pub use course::CourseOwnership;
pub use grade::Grade;
pub use identity::Role;
pub use question::Question;
pub use quiz::Quiz;
