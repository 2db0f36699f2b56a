use std::sync::Arc;

use mongodb::bson::doc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{LessonProgress, SubBabProgress},
    repositories::{ContentDirectory, DocumentCollection, ProgressStore, UpsertWriter},
    services::{
        aggregation::summarize_lesson,
        retry::{retry, RetryPolicy},
    },
};

/// Keeps one lesson summary per (student, lesson) in step with its sub-babs.
pub struct LessonProgressAggregator {
    sub_babs: Arc<dyn DocumentCollection<SubBabProgress>>,
    lessons: Arc<dyn DocumentCollection<LessonProgress>>,
    writer: UpsertWriter<LessonProgress>,
    content: Arc<dyn ContentDirectory>,
    write_policy: RetryPolicy,
}

impl LessonProgressAggregator {
    pub fn new(
        store: &ProgressStore,
        content: Arc<dyn ContentDirectory>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            sub_babs: Arc::clone(&store.sub_babs),
            lessons: Arc::clone(&store.lessons),
            writer: UpsertWriter::new(Arc::clone(&store.lessons)),
            content,
            write_policy,
        }
    }

    /// Rebuilds the lesson summary from the stored sub-bab records. Returns
    /// `None` without writing when the student has no sub-bab progress in
    /// the lesson.
    pub async fn recompute(
        &self,
        student_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>> {
        retry(self.write_policy, "lesson progress recompute", move || {
            self.recompute_once(student_id, lesson_id)
        })
        .await
    }

    async fn recompute_once(
        &self,
        student_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>> {
        let expected_version = self
            .writer
            .current_version(&LessonProgress::key_for(student_id, lesson_id))
            .await?;
        let sub_babs = self
            .sub_babs
            .find_matching(doc! { "studentId": student_id, "lessonId": lesson_id })
            .await?;

        if sub_babs.is_empty() {
            log::debug!(
                "No sub-bab progress for student {} in lesson {}",
                student_id,
                lesson_id
            );
            return Ok(None);
        }

        let lesson = self
            .content
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson '{}' not found", lesson_id)))?;

        let Some(summary) = summarize_lesson(student_id, &lesson, &sub_babs) else {
            return Ok(None);
        };

        let written = self.writer.write_expecting(expected_version, summary).await?;
        log::debug!(
            "Lesson {} at {}% for student {}",
            lesson_id,
            written.progress_percentage,
            student_id
        );
        Ok(Some(written))
    }

    pub async fn find(
        &self,
        student_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>> {
        self.lessons
            .find_by_key(&LessonProgress::key_for(student_id, lesson_id))
            .await
    }
}
