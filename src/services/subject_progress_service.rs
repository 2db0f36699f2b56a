use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::doc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{LessonProgress, SubjectProgress},
    repositories::{ContentDirectory, DocumentCollection, ProgressStore, UpsertWriter},
    services::{
        aggregation::summarize_subject,
        retry::{retry, RetryPolicy},
    },
};

pub struct SubjectProgressAggregator {
    lessons: Arc<dyn DocumentCollection<LessonProgress>>,
    subjects: Arc<dyn DocumentCollection<SubjectProgress>>,
    writer: UpsertWriter<SubjectProgress>,
    content: Arc<dyn ContentDirectory>,
    write_policy: RetryPolicy,
}

impl SubjectProgressAggregator {
    pub fn new(
        store: &ProgressStore,
        content: Arc<dyn ContentDirectory>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            lessons: Arc::clone(&store.lessons),
            subjects: Arc::clone(&store.subjects),
            writer: UpsertWriter::new(Arc::clone(&store.subjects)),
            content,
            write_policy,
        }
    }

    pub async fn recompute(
        &self,
        student_id: &str,
        subject_id: &str,
    ) -> AppResult<Option<SubjectProgress>> {
        retry(self.write_policy, "subject progress recompute", move || {
            self.recompute_once(student_id, subject_id)
        })
        .await
    }

    async fn recompute_once(
        &self,
        student_id: &str,
        subject_id: &str,
    ) -> AppResult<Option<SubjectProgress>> {
        let expected_version = self
            .writer
            .current_version(&SubjectProgress::key_for(student_id, subject_id))
            .await?;
        let lessons = self
            .lessons
            .find_matching(doc! { "studentId": student_id, "subjectId": subject_id })
            .await?;

        if lessons.is_empty() {
            return Ok(None);
        }

        let subject = self
            .content
            .find_subject(subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject '{}' not found", subject_id)))?;

        let today = Utc::now().date_naive();
        let Some(summary) = summarize_subject(student_id, &subject, lessons, today) else {
            return Ok(None);
        };

        let written = self.writer.write_expecting(expected_version, summary).await?;
        Ok(Some(written))
    }

    pub async fn find(
        &self,
        student_id: &str,
        subject_id: &str,
    ) -> AppResult<Option<SubjectProgress>> {
        self.subjects
            .find_by_key(&SubjectProgress::key_for(student_id, subject_id))
            .await
    }

    /// Every subject summary of the student, most recently active first.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<SubjectProgress>> {
        self.subjects
            .find_matching_recent_first(doc! { "studentId": student_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::SubjectInfo, repositories::content_repository::MockContentDirectory,
    };

    fn lesson(lesson_id: &str, subject_id: &str, completed: bool) -> LessonProgress {
        LessonProgress {
            id: LessonProgress::key_for("student-1", lesson_id),
            student_id: "student-1".to_string(),
            lesson_id: lesson_id.to_string(),
            lesson_title: String::new(),
            subject_id: subject_id.to_string(),
            progress_percentage: if completed { 100 } else { 50 },
            completed_sub_babs: if completed { 2 } else { 1 },
            total_sub_babs: 2,
            quiz_scores: vec![],
            quiz_average: 0.0,
            total_time_spent: 120,
            last_activity_date: Utc::now(),
            is_completed: completed,
            version: 0,
        }
    }

    fn content() -> MockContentDirectory {
        let mut content = MockContentDirectory::new();
        content.expect_find_subject().returning(|id| {
            Ok(Some(SubjectInfo {
                id: id.to_string(),
                name: "Mathematics".to_string(),
            }))
        });
        content
    }

    #[tokio::test]
    async fn recompute_only_reads_lessons_of_the_subject() {
        let store = ProgressStore::in_memory();
        let lessons = UpsertWriter::new(Arc::clone(&store.lessons));
        lessons.upsert(lesson("lesson-1", "math", true)).await.unwrap();
        lessons.upsert(lesson("lesson-2", "math", false)).await.unwrap();
        lessons.upsert(lesson("lesson-9", "science", true)).await.unwrap();
        let aggregator = SubjectProgressAggregator::new(
            &store,
            Arc::new(content()),
            RetryPolicy::on_conflict(3),
        );

        let written = aggregator.recompute("student-1", "math").await.unwrap().unwrap();

        assert_eq!(written.total_lessons, 2);
        assert_eq!(written.completed_lessons, 1);
        assert_eq!(written.progress_percentage, 50);
        assert_eq!(written.total_time_spent, 240);
        assert_eq!(written.subject_name, "Mathematics");
        assert_eq!(written.streak, 1);
        assert_eq!(aggregator.list_for_student("student-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recompute_without_lessons_is_a_no_op() {
        let store = ProgressStore::in_memory();
        let aggregator = SubjectProgressAggregator::new(
            &store,
            Arc::new(content()),
            RetryPolicy::on_conflict(3),
        );

        assert!(aggregator.recompute("student-1", "math").await.unwrap().is_none());
        assert!(aggregator.find("student-1", "math").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_subject_is_not_found() {
        let store = ProgressStore::in_memory();
        UpsertWriter::new(Arc::clone(&store.lessons))
            .upsert(lesson("lesson-1", "math", false))
            .await
            .unwrap();
        let mut content = MockContentDirectory::new();
        content.expect_find_subject().returning(|_| Ok(None));
        let aggregator =
            SubjectProgressAggregator::new(&store, Arc::new(content), RetryPolicy::on_conflict(3));

        let result = aggregator.recompute("student-1", "math").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
