use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::models::domain::material::MaterialType;
use crate::repositories::document::{document_key, ProgressDocument};

/// Leaf progress record for one (student, sub-bab) pair.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubBabProgress {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub sub_bab_id: String,
    pub lesson_id: String,
    pub completed_materials: BTreeMap<String, bool>,
    pub quiz_score: f64,
    pub time_spent: i64, // seconds
    pub last_activity_date: DateTime<Utc>,
    pub is_completed: bool,
    #[serde(default)]
    pub version: i64,
}

impl SubBabProgress {
    pub fn key_for(student_id: &str, sub_bab_id: &str) -> String {
        document_key(student_id, sub_bab_id)
    }

    /// Fresh record with every tracked material marked incomplete.
    pub fn seed(
        student_id: &str,
        sub_bab_id: &str,
        lesson_id: &str,
        tracked: &[MaterialType],
    ) -> Self {
        let completed_materials = tracked
            .iter()
            .map(|material| (material.as_str().to_string(), false))
            .collect();

        SubBabProgress {
            id: Self::key_for(student_id, sub_bab_id),
            student_id: student_id.to_string(),
            sub_bab_id: sub_bab_id.to_string(),
            lesson_id: lesson_id.to_string(),
            completed_materials,
            quiz_score: 0.0,
            time_spent: 0,
            last_activity_date: Utc::now(),
            is_completed: false,
            version: 0,
        }
    }

    pub fn mark_material(&mut self, material: MaterialType) {
        self.completed_materials
            .insert(material.as_str().to_string(), true);
        self.refresh_completion();
    }

    /// Completed once every known material key maps to true.
    pub fn refresh_completion(&mut self) {
        self.is_completed = !self.completed_materials.is_empty()
            && self.completed_materials.values().all(|done| *done);
    }

    pub fn is_material_completed(&self, material: MaterialType) -> bool {
        self.completed_materials
            .get(material.as_str())
            .copied()
            .unwrap_or(false)
    }
}

impl ProgressDocument for SubBabProgress {
    const COLLECTION: &'static str = "subBabProgress";
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
        vec![
            doc! { "studentId": 1, "lessonId": 1 },
            doc! { "studentId": 1 },
        ]
    }
}
