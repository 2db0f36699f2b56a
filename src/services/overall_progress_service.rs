use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::doc;

use crate::{
    errors::AppResult,
    models::domain::{OverallProgress, SubjectProgress},
    repositories::{DocumentCollection, ProgressStore, StudentDirectory, UpsertWriter},
    services::{
        aggregation::summarize_overall,
        retry::{retry, RetryPolicy},
    },
};

/// Terminal stage of the cascade: one record per student.
pub struct OverallProgressAggregator {
    subjects: Arc<dyn DocumentCollection<SubjectProgress>>,
    overall: Arc<dyn DocumentCollection<OverallProgress>>,
    writer: UpsertWriter<OverallProgress>,
    students: Arc<dyn StudentDirectory>,
    write_policy: RetryPolicy,
}

impl OverallProgressAggregator {
    pub fn new(
        store: &ProgressStore,
        students: Arc<dyn StudentDirectory>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            subjects: Arc::clone(&store.subjects),
            overall: Arc::clone(&store.overall),
            writer: UpsertWriter::new(Arc::clone(&store.overall)),
            students,
            write_policy,
        }
    }

    pub async fn recompute(&self, student_id: &str) -> AppResult<Option<OverallProgress>> {
        retry(self.write_policy, "overall progress recompute", move || {
            self.recompute_once(student_id)
        })
        .await
    }

    async fn recompute_once(&self, student_id: &str) -> AppResult<Option<OverallProgress>> {
        let expected_version = self
            .writer
            .current_version(&OverallProgress::key_for(student_id))
            .await?;
        let subjects = self
            .subjects
            .find_matching(doc! { "studentId": student_id })
            .await?;

        if subjects.is_empty() {
            return Ok(None);
        }

        let student_name = match self.students.student_name(student_id).await? {
            Some(name) => name,
            None => {
                log::warn!("No profile for student {}, storing an empty name", student_id);
                String::new()
            }
        };

        let today = Utc::now().date_naive();
        let Some(summary) = summarize_overall(student_id, &student_name, subjects, today) else {
            return Ok(None);
        };

        let written = self.writer.write_expecting(expected_version, summary).await?;
        Ok(Some(written))
    }

    pub async fn find(&self, student_id: &str) -> AppResult<Option<OverallProgress>> {
        self.overall
            .find_by_key(&OverallProgress::key_for(student_id))
            .await
    }
}
