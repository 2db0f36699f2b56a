mod common;

use std::sync::Arc;

use common::{app, app_with, STUDENT};
use learnable_progress::{
    config::Config,
    errors::AppError,
    models::{domain::MaterialType, dto::CascadeStage},
    repositories::ProgressStore,
};

#[tokio::test]
async fn first_event_for_a_student_builds_every_summary() {
    let app = app();

    let update = app
        .progress
        .mark_material_completed(STUDENT, "sub-a1", "lesson-a", "pdf")
        .await
        .unwrap();

    assert!(update.cascade.is_complete());
    let lesson = app.queries.lesson(STUDENT, "lesson-a").await.unwrap().unwrap();
    assert_eq!(lesson.total_sub_babs, 1);
    assert_eq!(lesson.progress_percentage, 0);
    let overall = app.queries.overall(STUDENT).await.unwrap().unwrap();
    assert_eq!(overall.student_name, "Budi Santoso");
    assert_eq!(overall.total_subjects, 1);
}

#[tokio::test]
async fn half_finished_lesson_reports_fifty_percent() {
    let app = app();
    for material in MaterialType::ALL {
        app.progress
            .mark_material_completed(STUDENT, "sub-a1", "lesson-a", material.as_str())
            .await
            .unwrap();
    }
    app.progress
        .update_time_spent(STUDENT, "sub-a2", "lesson-a", 60)
        .await
        .unwrap();

    let lesson = app.queries.lesson(STUDENT, "lesson-a").await.unwrap().unwrap();
    assert_eq!(lesson.completed_sub_babs, 1);
    assert_eq!(lesson.total_sub_babs, 2);
    assert_eq!(lesson.progress_percentage, 50);
    assert!(!lesson.is_completed);

    let subject = app.queries.subject(STUDENT, "algebra").await.unwrap().unwrap();
    assert_eq!(subject.total_lessons, 1);
    assert_eq!(subject.completed_lessons, 0);
    assert_eq!(subject.progress_percentage, 0);
    assert_eq!(subject.lesson_progress, vec![lesson]);
}

#[tokio::test]
async fn overall_averages_subject_percentages() {
    let app = app();
    for material in MaterialType::ALL {
        app.progress
            .mark_material_completed(STUDENT, "sub-c1", "lesson-c", material.as_str())
            .await
            .unwrap();
    }
    app.progress
        .update_time_spent(STUDENT, "sub-a1", "lesson-a", 30)
        .await
        .unwrap();

    let biology = app.queries.subject(STUDENT, "biology").await.unwrap().unwrap();
    assert_eq!(biology.progress_percentage, 100);

    let overall = app.queries.overall(STUDENT).await.unwrap().unwrap();
    assert_eq!(overall.total_subjects, 2);
    assert_eq!(overall.completed_subjects, 1);
    assert_eq!(overall.overall_progress_percentage, 50);
    assert_eq!(overall.total_time_spent, 30);
    assert_eq!(overall.streak, 1);

    let subjects = app.queries.subjects(STUDENT).await.unwrap();
    assert_eq!(subjects.len(), 2);
}

#[tokio::test]
async fn unknown_lesson_fails_after_the_leaf_write() {
    let app = app();

    let result = app
        .progress
        .update_time_spent(STUDENT, "sub-x", "lesson-unknown", 10)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let leaf = app.progress.find(STUDENT, "sub-x").await.unwrap().unwrap();
    assert_eq!(leaf.time_spent, 10);
    assert!(app.queries.overall(STUDENT).await.unwrap().is_none());
}

#[tokio::test]
async fn rebuild_restores_summaries_from_leaf_records() {
    let app = app();
    app.progress
        .update_time_spent(STUDENT, "sub-a1", "lesson-a", 20)
        .await
        .unwrap();
    app.progress
        .update_time_spent(STUDENT, "sub-b1", "lesson-b", 40)
        .await
        .unwrap();

    let report = app.cascade.rebuild_student(STUDENT).await.unwrap();
    assert_eq!(report.lessons_written, 2);
    assert_eq!(report.subjects_written, 1);
    assert!(report.overall_written);
    let overall = app.queries.overall(STUDENT).await.unwrap().unwrap();
    assert_eq!(overall.total_time_spent, 60);
}

#[tokio::test]
async fn cascade_report_marks_every_stage() {
    let app = app();

    let update = app
        .progress
        .update_time_spent(STUDENT, "sub-b1", "lesson-b", 5)
        .await
        .unwrap();

    for stage in [CascadeStage::Lesson, CascadeStage::Subject, CascadeStage::Overall] {
        assert!(update.cascade.outcome_of(stage).is_some());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_time_updates_are_not_lost() {
    let config = Config {
        progress_write_attempts: 50,
        ..Config::test_config()
    };
    let app = Arc::new(app_with(config, ProgressStore::in_memory()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                app.progress
                    .update_time_spent(STUDENT, "sub-a1", "lesson-a", 15)
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let leaf = app.progress.find(STUDENT, "sub-a1").await.unwrap().unwrap();
    assert_eq!(leaf.time_spent, 120);
    assert_eq!(leaf.version, 8);
}
