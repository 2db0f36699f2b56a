use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::StudentProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Display name of the student, `None` when the profile is missing.
    async fn student_name(&self, student_id: &str) -> AppResult<Option<String>>;
}

pub struct MongoStudentDirectory {
    collection: Collection<StudentProfile>,
}

impl MongoStudentDirectory {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }
}

#[async_trait]
impl StudentDirectory for MongoStudentDirectory {
    async fn student_name(&self, student_id: &str) -> AppResult<Option<String>> {
        let profile = self
            .collection
            .find_one(doc! { "_id": student_id })
            .await?;
        Ok(profile.map(|p| p.name))
    }
}
