use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::subject_progress::SubjectProgress;
use crate::repositories::document::ProgressDocument;

/// One per student; keyed by the student id alone.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub total_subjects: i32,
    pub completed_subjects: i32,
    pub overall_progress_percentage: i32,
    #[serde(default)]
    pub quiz_average: f64,
    pub total_time_spent: i64,
    #[serde(default)]
    pub streak: u32,
    pub last_activity_date: DateTime<Utc>,
    pub subject_progress: Vec<SubjectProgress>,
    #[serde(default)]
    pub version: i64,
}

impl OverallProgress {
    pub fn key_for(student_id: &str) -> String {
        student_id.to_string()
    }
}

impl ProgressDocument for OverallProgress {
    const COLLECTION: &'static str = "overallProgress";
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
}
