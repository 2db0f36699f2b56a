use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{LessonInfo, SubBabInfo, SubjectInfo},
};

/// Read access to the content hierarchy. The engine never writes content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentDirectory: Send + Sync {
    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Option<LessonInfo>>;
    async fn find_subject(&self, subject_id: &str) -> AppResult<Option<SubjectInfo>>;
    async fn find_sub_bab(&self, sub_bab_id: &str) -> AppResult<Option<SubBabInfo>>;
}

pub struct MongoContentDirectory {
    lessons: Collection<LessonInfo>,
    subjects: Collection<SubjectInfo>,
    sub_babs: Collection<SubBabInfo>,
}

impl MongoContentDirectory {
    pub fn new(db: &Database) -> Self {
        Self {
            lessons: db.get_collection("lessons"),
            subjects: db.get_collection("subjects"),
            sub_babs: db.get_collection("subBabs"),
        }
    }
}

#[async_trait]
impl ContentDirectory for MongoContentDirectory {
    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Option<LessonInfo>> {
        let lesson = self.lessons.find_one(doc! { "_id": lesson_id }).await?;
        Ok(lesson)
    }

    async fn find_subject(&self, subject_id: &str) -> AppResult<Option<SubjectInfo>> {
        let subject = self.subjects.find_one(doc! { "_id": subject_id }).await?;
        Ok(subject)
    }

    async fn find_sub_bab(&self, sub_bab_id: &str) -> AppResult<Option<SubBabInfo>> {
        let sub_bab = self.sub_babs.find_one(doc! { "_id": sub_bab_id }).await?;
        Ok(sub_bab)
    }
}
