//! Pure authorization rules shared by the quiz catalog and attempt paths.
//! Role, enrollment and ownership facts come from the collaborators; these
//! functions only combine them.

use crate::models::domain::{CourseOwnership, Role};

/// Quiz create/update/delete: the course's instructor, the course's creator,
/// the quiz's own creator, or an elevated role.
pub fn can_manage_quiz(
    caller_id: &str,
    role: Role,
    ownership: &CourseOwnership,
    quiz_creator: Option<&str>,
) -> bool {
    role.is_elevated() || ownership.owns(caller_id) || quiz_creator == Some(caller_id)
}

/// Full attempt reads (answer key included): the owning student, the quiz
/// creator, the course instructor, or an elevated role.
pub fn can_view_full_attempt(
    caller_id: &str,
    role: Role,
    ownership: &CourseOwnership,
    quiz_creator: &str,
    attempt_student: &str,
) -> bool {
    caller_id == attempt_student
        || role.is_elevated()
        || ownership.instructor_id == caller_id
        || quiz_creator == caller_id
}
