//! External collaborators consumed by the engine: enrollment, course
//! ownership and role lookups. The engine depends only on these traits;
//! the Mongo implementations read collections owned by the surrounding
//! academic record system.

use async_trait::async_trait;
use mongodb::{bson::doc, Collection};
use serde::Deserialize;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{CourseOwnership, Role},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentOracle: Send + Sync {
    async fn is_actively_enrolled(&self, student_id: &str, course_id: &str) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn get_course_ownership(&self, course_id: &str) -> AppResult<Option<CourseOwnership>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn get_role(&self, user_id: &str) -> AppResult<Role>;
}

#[derive(Debug, Deserialize)]
struct EnrollmentRecord {
    #[allow(dead_code)]
    student_id: String,
    #[allow(dead_code)]
    course_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[allow(dead_code)]
    id: String,
    instructor_id: String,
    created_by_id: String,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    #[allow(dead_code)]
    id: String,
    role: Role,
}

pub struct MongoEnrollmentOracle {
    collection: Collection<EnrollmentRecord>,
}

impl MongoEnrollmentOracle {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("enrollments"),
        }
    }
}

#[async_trait]
impl EnrollmentOracle for MongoEnrollmentOracle {
    async fn is_actively_enrolled(&self, student_id: &str, course_id: &str) -> AppResult<bool> {
        let record = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "course_id": course_id
            })
            .await?;

        Ok(matches!(record, Some(r) if r.status == "active"))
    }
}

pub struct MongoCourseDirectory {
    collection: Collection<CourseRecord>,
}

impl MongoCourseDirectory {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("courses"),
        }
    }
}

#[async_trait]
impl CourseDirectory for MongoCourseDirectory {
    async fn get_course_ownership(&self, course_id: &str) -> AppResult<Option<CourseOwnership>> {
        let course = self.collection.find_one(doc! { "id": course_id }).await?;

        Ok(course.map(|c| CourseOwnership {
            instructor_id: c.instructor_id,
            creator_id: c.created_by_id,
        }))
    }
}

pub struct MongoIdentityDirectory {
    collection: Collection<UserRecord>,
}

impl MongoIdentityDirectory {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("users"),
        }
    }
}

#[async_trait]
impl IdentityDirectory for MongoIdentityDirectory {
    async fn get_role(&self, user_id: &str) -> AppResult<Role> {
        let user = self
            .collection
            .find_one(doc! { "id": user_id })
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown user '{}'", user_id)))?;

        Ok(user.role)
    }
}
