use std::{collections::BTreeSet, sync::Arc};

use mongodb::bson::doc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::SubBabProgress,
        dto::{CascadeReport, CascadeStage, RebuildReport, StageOutcome},
    },
    repositories::{ContentDirectory, DocumentCollection, ProgressStore, StudentDirectory},
    services::{
        lesson_progress_service::LessonProgressAggregator,
        overall_progress_service::OverallProgressAggregator, retry::RetryPolicy,
        subject_progress_service::SubjectProgressAggregator,
    },
};

/// Lesson → subject → overall. Each stage commits its summary before the next
/// one starts; a failure leaves the committed stages in place.
pub struct ProgressCascade {
    sub_babs: Arc<dyn DocumentCollection<SubBabProgress>>,
    lessons: LessonProgressAggregator,
    subjects: SubjectProgressAggregator,
    overall: OverallProgressAggregator,
}

fn stage_failed(
    report: &CascadeReport,
    stage: CascadeStage,
    student_id: &str,
    err: AppError,
) -> AppError {
    log::error!(
        "Progress cascade for student {} failed at {:?} stage with {} stage(s) committed: {}",
        student_id,
        stage,
        report.stages_written(),
        err
    );
    err
}

impl ProgressCascade {
    pub fn new(
        store: &ProgressStore,
        content: Arc<dyn ContentDirectory>,
        students: Arc<dyn StudentDirectory>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            sub_babs: Arc::clone(&store.sub_babs),
            lessons: LessonProgressAggregator::new(store, Arc::clone(&content), write_policy),
            subjects: SubjectProgressAggregator::new(store, content, write_policy),
            overall: OverallProgressAggregator::new(store, students, write_policy),
        }
    }

    pub fn lessons(&self) -> &LessonProgressAggregator {
        &self.lessons
    }

    pub fn subjects(&self) -> &SubjectProgressAggregator {
        &self.subjects
    }

    pub fn overall(&self) -> &OverallProgressAggregator {
        &self.overall
    }

    pub async fn run_from_lesson(
        &self,
        student_id: &str,
        lesson_id: &str,
    ) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();

        let lesson = self
            .lessons
            .recompute(student_id, lesson_id)
            .await
            .map_err(|err| stage_failed(&report, CascadeStage::Lesson, student_id, err))?;

        match lesson {
            Some(lesson) => {
                report.record(CascadeStage::Lesson, StageOutcome::Written);
                self.continue_from_subject(student_id, &lesson.subject_id, report)
                    .await
            }
            None => {
                report.record(CascadeStage::Lesson, StageOutcome::Skipped);
                Ok(report)
            }
        }
    }

    pub async fn run_from_subject(
        &self,
        student_id: &str,
        subject_id: &str,
    ) -> AppResult<CascadeReport> {
        self.continue_from_subject(student_id, subject_id, CascadeReport::default())
            .await
    }

    pub async fn run_from_overall(&self, student_id: &str) -> AppResult<CascadeReport> {
        self.continue_from_overall(student_id, CascadeReport::default())
            .await
    }

    async fn continue_from_subject(
        &self,
        student_id: &str,
        subject_id: &str,
        mut report: CascadeReport,
    ) -> AppResult<CascadeReport> {
        let subject = self
            .subjects
            .recompute(student_id, subject_id)
            .await
            .map_err(|err| stage_failed(&report, CascadeStage::Subject, student_id, err))?;

        if subject.is_none() {
            report.record(CascadeStage::Subject, StageOutcome::Skipped);
            return Ok(report);
        }

        report.record(CascadeStage::Subject, StageOutcome::Written);
        self.continue_from_overall(student_id, report).await
    }

    async fn continue_from_overall(
        &self,
        student_id: &str,
        mut report: CascadeReport,
    ) -> AppResult<CascadeReport> {
        let overall = self
            .overall
            .recompute(student_id)
            .await
            .map_err(|err| stage_failed(&report, CascadeStage::Overall, student_id, err))?;

        let outcome = if overall.is_some() {
            StageOutcome::Written
        } else {
            StageOutcome::Skipped
        };
        report.record(CascadeStage::Overall, outcome);
        Ok(report)
    }

    /// Recomputes every summary of the student from the sub-bab records up.
    /// Heals summaries left behind by an interrupted cascade.
    pub async fn rebuild_student(&self, student_id: &str) -> AppResult<RebuildReport> {
        let sub_babs = self
            .sub_babs
            .find_matching(doc! { "studentId": student_id })
            .await?;
        let lesson_ids: BTreeSet<&str> = sub_babs.iter().map(|s| s.lesson_id.as_str()).collect();

        let mut report = RebuildReport::default();
        let mut subject_ids = BTreeSet::new();

        for lesson_id in lesson_ids {
            if let Some(lesson) = self.lessons.recompute(student_id, lesson_id).await? {
                report.lessons_written += 1;
                subject_ids.insert(lesson.subject_id);
            }
        }

        for subject_id in &subject_ids {
            if self.subjects.recompute(student_id, subject_id).await?.is_some() {
                report.subjects_written += 1;
            }
        }

        report.overall_written = self.overall.recompute(student_id).await?.is_some();

        log::info!(
            "Rebuilt progress for student {}: {} lesson(s), {} subject(s), overall {}",
            student_id,
            report.lessons_written,
            report.subjects_written,
            if report.overall_written { "written" } else { "skipped" }
        );
        Ok(report)
    }
}
