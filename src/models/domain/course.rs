use serde::{Deserialize, Serialize};

/// Course ownership as reported by the external course directory, used for
/// authorization decisions in the quiz catalog and attempt views.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CourseOwnership {
    pub instructor_id: String,
    pub creator_id: String,
}

impl CourseOwnership {
    pub fn owns(&self, user_id: &str) -> bool {
        self.instructor_id == user_id || self.creator_id == user_id
    }
}
