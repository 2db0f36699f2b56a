use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use mongodb::bson::doc;
use validator::Validate;

use crate::{
    auth::IdentityProvider,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizResult},
        dto::{GradeEssayRequest, QuizOutcome, QuizScores, SubmitQuizRequest},
    },
    repositories::{ContentDirectory, DocumentCollection, ProgressStore, UpsertWriter},
    services::{
        retry::{retry, RetryPolicy},
        sub_bab_progress_service::SubBabProgressManager,
    },
};

/// Scores one attempt against `quiz`.
///
/// Multiple-choice answers are matched by question position, a missing
/// answer counting as -1. Essay questions count as correct only once graded
/// `true`; ungraded essays count against the student. With both kinds
/// present the total is the mean of the two partial scores.
pub fn calculate_quiz_scores(
    quiz: &Quiz,
    answers: &[i32],
    essay_grading: &BTreeMap<String, bool>,
) -> QuizScores {
    let multiple_choice_score = multiple_choice_score(quiz, answers);
    let total_multiple_choice = quiz.multiple_choice_questions().count();

    let essays: Vec<_> = quiz.essay_questions().collect();
    if essays.is_empty() {
        return QuizScores {
            multiple_choice_score,
            essay_score: None,
            total_score: multiple_choice_score,
        };
    }

    let correct_essays = essays
        .iter()
        .filter(|question| essay_grading.get(&question.id).copied().unwrap_or(false))
        .count();
    let essay_score = correct_essays as f64 / essays.len() as f64 * 100.0;

    let total_score = if total_multiple_choice > 0 {
        (multiple_choice_score + essay_score) / 2.0
    } else {
        essay_score
    };

    QuizScores {
        multiple_choice_score,
        essay_score: Some(essay_score),
        total_score,
    }
}

fn multiple_choice_score(quiz: &Quiz, answers: &[i32]) -> f64 {
    let mut total = 0usize;
    let mut correct = 0usize;
    for (index, question) in quiz.multiple_choice_questions() {
        total += 1;
        if answers.get(index).copied().unwrap_or(-1) == question.correct_answer {
            correct += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

/// Submission, essay grading and re-scoring of quiz attempts. Every change
/// to a score is pushed into the student's sub-bab progress.
pub struct QuizScoringEngine {
    results: Arc<dyn DocumentCollection<QuizResult>>,
    writer: UpsertWriter<QuizResult>,
    progress: Arc<SubBabProgressManager>,
    content: Arc<dyn ContentDirectory>,
    identity: Arc<dyn IdentityProvider>,
    write_policy: RetryPolicy,
}

impl QuizScoringEngine {
    pub fn new(
        store: &ProgressStore,
        progress: Arc<SubBabProgressManager>,
        content: Arc<dyn ContentDirectory>,
        identity: Arc<dyn IdentityProvider>,
        write_policy: RetryPolicy,
    ) -> Self {
        Self {
            results: Arc::clone(&store.quiz_results),
            writer: UpsertWriter::new(Arc::clone(&store.quiz_results)),
            progress,
            content,
            identity,
            write_policy,
        }
    }

    /// Records the signed-in student's attempt. Only the multiple-choice part
    /// is scored here; essay grading from an earlier attempt is kept and
    /// folded in by the next grading or recalculation.
    pub async fn submit_quiz(
        &self,
        quiz: &Quiz,
        request: SubmitQuizRequest,
    ) -> AppResult<QuizOutcome> {
        quiz.validate()?;
        request.validate()?;
        if request.answers.len() > quiz.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' has {} questions but {} answers were submitted",
                quiz.id,
                quiz.questions.len(),
                request.answers.len()
            )));
        }

        let student_id = self.identity.current_student_id().await?;
        let lesson_id = self.lesson_of(&quiz.sub_bab_id).await?;

        let score = multiple_choice_score(quiz, &request.answers);
        let scores = QuizScores {
            multiple_choice_score: score,
            essay_score: None,
            total_score: score,
        };
        let is_passed = score >= quiz.passing_score;

        let key = QuizResult::key_for(&student_id, &quiz.sub_bab_id);
        let (key, student, request) = (key.as_str(), student_id.as_str(), &request);

        let result = retry(self.write_policy, "quiz result submit", move || async move {
            self.writer
                .modify(key, |current| {
                    let essay_grading = current
                        .map(|existing| existing.essay_grading)
                        .unwrap_or_default();
                    Ok(QuizResult {
                        id: key.to_string(),
                        student_id: student.to_string(),
                        quiz_id: quiz.id.clone(),
                        sub_bab_id: quiz.sub_bab_id.clone(),
                        score,
                        answers: request.answers.clone(),
                        essay_answers: request.essay_answers.clone(),
                        essay_grading,
                        time_spent: request.time_spent,
                        completed_at: Utc::now(),
                        is_passed,
                        version: 0,
                    })
                })
                .await
        })
        .await?;

        log::info!(
            "Student {} submitted quiz {} with score {:.2}",
            student_id,
            quiz.id,
            score
        );

        let progress = self
            .progress
            .update_quiz_score(&student_id, &quiz.sub_bab_id, &lesson_id, score)
            .await?;

        Ok(QuizOutcome {
            result,
            scores,
            progress,
        })
    }

    /// Stores an instructor's verdict on one essay answer and re-scores the
    /// attempt. Grading the same question again replaces the verdict.
    pub async fn grade_essay_answer(
        &self,
        request: GradeEssayRequest,
        quiz: &Quiz,
    ) -> AppResult<QuizOutcome> {
        request.validate()?;
        let is_essay = quiz
            .find_question(&request.question_id)
            .map(|question| question.is_essay())
            .unwrap_or(false);
        if !is_essay {
            return Err(AppError::ValidationError(format!(
                "Question '{}' is not an essay question of quiz '{}'",
                request.question_id, quiz.id
            )));
        }

        let grading = (request.question_id.as_str(), request.is_correct);
        self.rescore(&request.result_id, quiz, Some(grading)).await
    }

    /// Re-scores a stored attempt from its answers and current grading.
    pub async fn recalculate_score(&self, result_id: &str, quiz: &Quiz) -> AppResult<QuizOutcome> {
        self.rescore(result_id, quiz, None).await
    }

    async fn rescore(
        &self,
        result_id: &str,
        quiz: &Quiz,
        grading: Option<(&str, bool)>,
    ) -> AppResult<QuizOutcome> {
        quiz.validate()?;
        let lesson_id = self.lesson_of(&quiz.sub_bab_id).await?;

        let result = retry(self.write_policy, "quiz result rescore", move || async move {
            self.writer
                .modify(result_id, |current| {
                    let mut result = current.ok_or_else(|| {
                        AppError::NotFound(format!("Quiz result '{}' not found", result_id))
                    })?;
                    if result.quiz_id != quiz.id {
                        return Err(AppError::ValidationError(format!(
                            "Quiz result '{}' belongs to quiz '{}', not '{}'",
                            result_id, result.quiz_id, quiz.id
                        )));
                    }

                    if let Some((question_id, is_correct)) = grading {
                        result.essay_grading.insert(question_id.to_string(), is_correct);
                    }
                    let scores =
                        calculate_quiz_scores(quiz, &result.answers, &result.essay_grading);
                    result.score = scores.total_score;
                    result.is_passed = scores.total_score >= quiz.passing_score;
                    Ok(result)
                })
                .await
        })
        .await?;

        let scores = calculate_quiz_scores(quiz, &result.answers, &result.essay_grading);
        log::info!(
            "Quiz result {} re-scored to {:.2} ({} essay answer(s) graded)",
            result.id,
            scores.total_score,
            result.graded_essay_count()
        );

        let progress = self
            .progress
            .update_quiz_score(
                &result.student_id,
                &result.sub_bab_id,
                &lesson_id,
                scores.total_score,
            )
            .await?;

        Ok(QuizOutcome {
            result,
            scores,
            progress,
        })
    }

    async fn lesson_of(&self, sub_bab_id: &str) -> AppResult<String> {
        let sub_bab = self
            .content
            .find_sub_bab(sub_bab_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-bab '{}' not found", sub_bab_id)))?;
        Ok(sub_bab.lesson_id)
    }

    /// The signed-in student's attempt at the quiz of `sub_bab_id`.
    pub async fn find_result(&self, sub_bab_id: &str) -> AppResult<Option<QuizResult>> {
        let student_id = self.identity.current_student_id().await?;
        self.results
            .find_by_key(&QuizResult::key_for(&student_id, sub_bab_id))
            .await
    }

    pub async fn find_result_by_id(&self, result_id: &str) -> AppResult<QuizResult> {
        self.results
            .find_by_key(result_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz result '{}' not found", result_id)))
    }

    /// Every student's attempt for a sub-bab, latest submission first.
    pub async fn results_for_sub_bab(&self, sub_bab_id: &str) -> AppResult<Vec<QuizResult>> {
        self.results
            .find_matching_recent_first(doc! { "subBabId": sub_bab_id })
            .await
    }
}
