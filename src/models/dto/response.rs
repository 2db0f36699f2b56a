use serde::Serialize;

use crate::models::domain::{QuizResult, SubBabProgress};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadeStage {
    Lesson,
    Subject,
    Overall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StageOutcome {
    Written,
    /// No child records, so nothing to summarize.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: CascadeStage,
    pub outcome: StageOutcome,
}

/// Stages reached by one cascade run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub stages: Vec<StageReport>,
}

impl CascadeReport {
    pub fn record(&mut self, stage: CascadeStage, outcome: StageOutcome) {
        self.stages.push(StageReport { stage, outcome });
    }

    pub fn stages_written(&self) -> usize {
        self.stages
            .iter()
            .filter(|report| report.outcome == StageOutcome::Written)
            .count()
    }

    pub fn outcome_of(&self, stage: CascadeStage) -> Option<StageOutcome> {
        self.stages
            .iter()
            .find(|report| report.stage == stage)
            .map(|report| report.outcome)
    }

    /// True once the overall summary has been written.
    pub fn is_complete(&self) -> bool {
        self.outcome_of(CascadeStage::Overall) == Some(StageOutcome::Written)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildReport {
    pub lessons_written: usize,
    pub subjects_written: usize,
    pub overall_written: bool,
}

/// Result of a leaf event: the stored sub-bab record and what the cascade did.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub progress: SubBabProgress,
    pub cascade: CascadeReport,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScores {
    pub multiple_choice_score: f64,
    /// `None` when the quiz has no essay questions.
    pub essay_score: Option<f64>,
    pub total_score: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub scores: QuizScores,
    pub progress: ProgressUpdate,
}
