//! Summary calculations for each level of the progress hierarchy.
//!
//! Everything here is pure: the aggregator services load the child records
//! and the content metadata, call into this module and persist the result.
//! An empty child set never produces a summary.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::domain::{
    LessonInfo, LessonProgress, OverallProgress, SubBabProgress, SubjectInfo, SubjectProgress,
};

/// `floor(completed * 100 / total)`, 0 when there is nothing to complete.
pub fn percentage(completed: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    ((i64::from(completed) * 100) / i64::from(total)) as i32
}

/// Arithmetic mean, 0 for an empty list.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Consecutive days with activity ending today, or ending yesterday when
/// nothing happened today yet.
pub fn calculate_streak(activity: &[DateTime<Utc>], today: NaiveDate) -> u32 {
    let active_days: BTreeSet<NaiveDate> =
        activity.iter().map(|moment| moment.date_naive()).collect();

    let mut day = if active_days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while active_days.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

/// Sum of time totals, pinned at `i64::MAX` instead of wrapping.
fn total_time(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

fn latest(dates: impl Iterator<Item = DateTime<Utc>>) -> DateTime<Utc> {
    dates.max().unwrap_or_else(Utc::now)
}

pub fn summarize_lesson(
    student_id: &str,
    lesson: &LessonInfo,
    sub_babs: &[SubBabProgress],
) -> Option<LessonProgress> {
    if sub_babs.is_empty() {
        return None;
    }

    let total_sub_babs = sub_babs.len() as i32;
    let completed_sub_babs = sub_babs.iter().filter(|s| s.is_completed).count() as i32;
    let quiz_scores: Vec<f64> = sub_babs
        .iter()
        .map(|s| s.quiz_score)
        .filter(|score| *score > 0.0)
        .collect();

    Some(LessonProgress {
        id: LessonProgress::key_for(student_id, &lesson.id),
        student_id: student_id.to_string(),
        lesson_id: lesson.id.clone(),
        lesson_title: lesson.title.clone(),
        subject_id: lesson.subject_id.clone(),
        progress_percentage: percentage(completed_sub_babs, total_sub_babs),
        completed_sub_babs,
        total_sub_babs,
        quiz_average: mean(&quiz_scores),
        quiz_scores,
        total_time_spent: total_time(sub_babs.iter().map(|s| s.time_spent)),
        last_activity_date: latest(sub_babs.iter().map(|s| s.last_activity_date)),
        is_completed: completed_sub_babs == total_sub_babs,
        version: 0,
    })
}

pub fn summarize_subject(
    student_id: &str,
    subject: &SubjectInfo,
    mut lessons: Vec<LessonProgress>,
    today: NaiveDate,
) -> Option<SubjectProgress> {
    if lessons.is_empty() {
        return None;
    }
    lessons.sort_by(|a, b| a.lesson_id.cmp(&b.lesson_id));

    let total_lessons = lessons.len() as i32;
    let completed_lessons = lessons.iter().filter(|l| l.is_completed).count() as i32;
    let all_scores: Vec<f64> = lessons
        .iter()
        .flat_map(|l| l.quiz_scores.iter().copied())
        .collect();
    let activity: Vec<DateTime<Utc>> = lessons.iter().map(|l| l.last_activity_date).collect();

    Some(SubjectProgress {
        id: SubjectProgress::key_for(student_id, &subject.id),
        student_id: student_id.to_string(),
        subject_id: subject.id.clone(),
        subject_name: subject.name.clone(),
        progress_percentage: percentage(completed_lessons, total_lessons),
        completed_lessons,
        total_lessons,
        quiz_average: mean(&all_scores),
        total_time_spent: total_time(lessons.iter().map(|l| l.total_time_spent)),
        streak: calculate_streak(&activity, today),
        last_activity_date: latest(activity.iter().copied()),
        lesson_progress: lessons,
        version: 0,
    })
}

pub fn summarize_overall(
    student_id: &str,
    student_name: &str,
    mut subjects: Vec<SubjectProgress>,
    today: NaiveDate,
) -> Option<OverallProgress> {
    if subjects.is_empty() {
        return None;
    }
    subjects.sort_by(|a, b| a.subject_id.cmp(&b.subject_id));

    let total_subjects = subjects.len() as i32;
    let completed_subjects = subjects
        .iter()
        .filter(|s| s.progress_percentage == 100)
        .count() as i32;
    let percentage_sum: i32 = subjects.iter().map(|s| s.progress_percentage).sum();
    let subject_averages: Vec<f64> = subjects
        .iter()
        .map(|s| s.quiz_average)
        .filter(|average| *average > 0.0)
        .collect();
    let activity: Vec<DateTime<Utc>> = subjects.iter().map(|s| s.last_activity_date).collect();

    Some(OverallProgress {
        id: OverallProgress::key_for(student_id),
        student_id: student_id.to_string(),
        student_name: student_name.to_string(),
        total_subjects,
        completed_subjects,
        overall_progress_percentage: percentage_sum / total_subjects,
        quiz_average: mean(&subject_averages),
        total_time_spent: total_time(subjects.iter().map(|s| s.total_time_spent)),
        streak: calculate_streak(&activity, today),
        last_activity_date: latest(activity.iter().copied()),
        subject_progress: subjects,
        version: 0,
    })
}
