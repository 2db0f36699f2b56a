use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::repositories::document::{document_key, ProgressDocument};

/// A student's latest attempt at the quiz of one sub-bab. Resubmission and
/// essay grading update the same record.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    pub sub_bab_id: String,
    pub score: f64,
    pub answers: Vec<i32>, // selected option per question, -1 when unanswered
    #[serde(default)]
    pub essay_answers: BTreeMap<String, String>,
    #[serde(default)]
    pub essay_grading: BTreeMap<String, bool>,
    pub time_spent: i64,
    pub completed_at: DateTime<Utc>,
    pub is_passed: bool,
    #[serde(default)]
    pub version: i64,
}

impl QuizResult {
    pub fn key_for(student_id: &str, sub_bab_id: &str) -> String {
        document_key(student_id, sub_bab_id)
    }

    pub fn graded_essay_count(&self) -> usize {
        self.essay_grading.len()
    }
}

impl ProgressDocument for QuizResult {
    const COLLECTION: &'static str = "quizResult";
    const ACTIVITY_FIELD: &'static str = "completedAt";

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
        self.completed_at
    }

    fn secondary_indexes() -> Vec<Document> {
        vec![
            doc! { "subBabId": 1, "completedAt": -1 },
            doc! { "studentId": 1, "subBabId": 1 },
        ]
    }
}
