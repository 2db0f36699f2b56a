use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{LessonProgress, OverallProgress, SubjectProgress},
    services::progress_cascade::ProgressCascade,
};

/// Read side of the summaries, for dashboards.
pub struct ProgressQueryService {
    cascade: Arc<ProgressCascade>,
}

impl ProgressQueryService {
    pub fn new(cascade: Arc<ProgressCascade>) -> Self {
        Self { cascade }
    }

    pub async fn overall(&self, student_id: &str) -> AppResult<Option<OverallProgress>> {
        self.cascade.overall().find(student_id).await
    }

    pub async fn subjects(&self, student_id: &str) -> AppResult<Vec<SubjectProgress>> {
        self.cascade.subjects().list_for_student(student_id).await
    }

    pub async fn subject(
        &self,
        student_id: &str,
        subject_id: &str,
    ) -> AppResult<Option<SubjectProgress>> {
        self.cascade.subjects().find(student_id, subject_id).await
    }

    pub async fn lesson(
        &self,
        student_id: &str,
        lesson_id: &str,
    ) -> AppResult<Option<LessonProgress>> {
        self.cascade.lessons().find(student_id, lesson_id).await
    }
}
