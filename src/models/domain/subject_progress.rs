use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::models::domain::lesson_progress::LessonProgress;
use crate::repositories::document::{document_key, ProgressDocument};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub progress_percentage: i32,
    pub completed_lessons: i32,
    pub total_lessons: i32,
    pub quiz_average: f64,
    pub total_time_spent: i64,
    #[serde(default)]
    pub streak: u32,
    pub last_activity_date: DateTime<Utc>,
    pub lesson_progress: Vec<LessonProgress>, // snapshot at recompute time
    #[serde(default)]
    pub version: i64,
}

impl SubjectProgress {
    pub fn key_for(student_id: &str, subject_id: &str) -> String {
        document_key(student_id, subject_id)
    }
}

impl ProgressDocument for SubjectProgress {
    const COLLECTION: &'static str = "subjectProgress";
    const ACTIVITY_FIELD: &'static str = "lastActivityDate";

    fn key(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn activity_at(&self) -> DateTime<Utc> {
        self.last_activity_date
    }

    fn secondary_indexes() -> Vec<Document> {
        vec![doc! { "studentId": 1 }]
    }
}
