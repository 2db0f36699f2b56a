use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::doc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{MaterialType, SubBabProgress},
        dto::ProgressUpdate,
    },
    repositories::{DocumentCollection, ProgressStore, UpsertWriter},
    services::{
        notifier::CompletionNotifier,
        progress_cascade::ProgressCascade,
        retry::{retry, RetryPolicy},
    },
};

/// Applies leaf events to the (student, sub-bab) record and runs the cascade
/// after every successful write.
pub struct SubBabProgressManager {
    sub_babs: Arc<dyn DocumentCollection<SubBabProgress>>,
    writer: UpsertWriter<SubBabProgress>,
    cascade: Arc<ProgressCascade>,
    notifier: Arc<dyn CompletionNotifier>,
    tracked_materials: Vec<MaterialType>,
    write_policy: RetryPolicy,
}

impl SubBabProgressManager {
    pub fn new(
        store: &ProgressStore,
        cascade: Arc<ProgressCascade>,
        notifier: Arc<dyn CompletionNotifier>,
        tracked_materials: Vec<MaterialType>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            sub_babs: Arc::clone(&store.sub_babs),
            writer: UpsertWriter::new(Arc::clone(&store.sub_babs)),
            cascade,
            notifier,
            tracked_materials,
            write_policy,
        }
    }

    pub async fn mark_material_completed(
        &self,
        student_id: &str,
        sub_bab_id: &str,
        lesson_id: &str,
        material: &str,
    ) -> AppResult<ProgressUpdate> {
        let material: MaterialType = material.parse()?;

        self.apply(student_id, sub_bab_id, lesson_id, |progress| {
            progress.mark_material(material);
            Ok(())
        })
        .await
    }

    pub async fn update_quiz_score(
        &self,
        student_id: &str,
        sub_bab_id: &str,
        lesson_id: &str,
        score: f64,
    ) -> AppResult<ProgressUpdate> {
        if !(0.0..=100.0).contains(&score) {
            return Err(AppError::ValidationError(format!(
                "Quiz score must be between 0 and 100, got {}",
                score
            )));
        }

        self.apply(student_id, sub_bab_id, lesson_id, |progress| {
            progress.quiz_score = score;
            progress.mark_material(MaterialType::Quiz);
            Ok(())
        })
        .await
    }

    /// Adds `delta_seconds` to the time spent. Completion is left as is.
    pub async fn update_time_spent(
        &self,
        student_id: &str,
        sub_bab_id: &str,
        lesson_id: &str,
        delta_seconds: i64,
    ) -> AppResult<ProgressUpdate> {
        if delta_seconds < 0 {
            return Err(AppError::ValidationError(
                "Time spent cannot decrease".to_string(),
            ));
        }

        self.apply(student_id, sub_bab_id, lesson_id, |progress| {
            let total = progress.time_spent.checked_add(delta_seconds).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Time spent on sub-bab {} would overflow",
                    progress.sub_bab_id
                ))
            })?;
            progress.time_spent = total;
            Ok(())
        })
        .await
    }

    pub async fn find(
        &self,
        student_id: &str,
        sub_bab_id: &str,
    ) -> AppResult<Option<SubBabProgress>> {
        self.sub_babs
            .find_by_key(&SubBabProgress::key_for(student_id, sub_bab_id))
            .await
    }

    /// All sub-bab records of the student, most recently active first.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<SubBabProgress>> {
        self.sub_babs
            .find_matching_recent_first(doc! { "studentId": student_id })
            .await
    }

    async fn apply<F>(
        &self,
        student_id: &str,
        sub_bab_id: &str,
        lesson_id: &str,
        change: F,
    ) -> AppResult<ProgressUpdate>
    where
        F: Fn(&mut SubBabProgress) -> AppResult<()>,
    {
        let key = SubBabProgress::key_for(student_id, sub_bab_id);
        let key = key.as_str();
        let change = &change;

        let (progress, newly_completed) =
            retry(self.write_policy, "sub-bab progress write", move || async move {
                let mut was_completed = false;
                let progress = self
                    .writer
                    .modify(key, |current| {
                        let mut progress = current.unwrap_or_else(|| {
                            SubBabProgress::seed(
                                student_id,
                                sub_bab_id,
                                lesson_id,
                                &self.tracked_materials,
                            )
                        });
                        was_completed = progress.is_completed;
                        change(&mut progress)?;
                        progress.last_activity_date = Utc::now();
                        Ok(progress)
                    })
                    .await?;
                let newly_completed = !was_completed && progress.is_completed;
                Ok((progress, newly_completed))
            })
            .await?;

        let cascade = self
            .cascade
            .run_from_lesson(student_id, &progress.lesson_id)
            .await?;

        if newly_completed {
            if let Err(err) = self.notifier.sub_bab_completed(&progress).await {
                log::warn!(
                    "Completion notice for sub-bab {} of student {} failed: {}",
                    sub_bab_id,
                    student_id,
                    err
                );
            }
        }

        Ok(ProgressUpdate { progress, cascade })
    }
}
