use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::repositories::document::{document_key, ProgressDocument};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub lesson_id: String,
    #[serde(default)]
    pub lesson_title: String,
    pub subject_id: String,
    pub progress_percentage: i32,
    pub completed_sub_babs: i32,
    pub total_sub_babs: i32,
    pub quiz_scores: Vec<f64>,
    #[serde(default)]
    pub quiz_average: f64,
    pub total_time_spent: i64,
    pub last_activity_date: DateTime<Utc>,
    pub is_completed: bool,
    #[serde(default)]
    pub version: i64,
}

impl LessonProgress {
    pub fn key_for(student_id: &str, lesson_id: &str) -> String {
        document_key(student_id, lesson_id)
    }
}

impl ProgressDocument for LessonProgress {
    const COLLECTION: &'static str = "lessonProgress";
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
        vec![doc! { "studentId": 1, "subjectId": 1 }]
    }
}
