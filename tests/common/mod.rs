#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use learnable_progress::{
    app_state::{AppState, Collaborators},
    auth::StaticIdentity,
    config::Config,
    errors::AppResult,
    models::domain::{LessonInfo, QuestionType, Quiz, QuizQuestion, SubBabInfo, SubjectInfo},
    repositories::{ContentDirectory, ProgressStore, StudentDirectory},
    services::LogNotifier,
};

pub const STUDENT: &str = "student-1";

/// Fixed content tree:
/// algebra → lesson-a (sub-a1, sub-a2), lesson-b (sub-b1); biology → lesson-c (sub-c1).
pub struct StaticContent {
    lessons: HashMap<&'static str, &'static str>,
    sub_babs: HashMap<&'static str, &'static str>,
}

impl StaticContent {
    pub fn new() -> Self {
        Self {
            lessons: HashMap::from([
                ("lesson-a", "algebra"),
                ("lesson-b", "algebra"),
                ("lesson-c", "biology"),
            ]),
            sub_babs: HashMap::from([
                ("sub-a1", "lesson-a"),
                ("sub-a2", "lesson-a"),
                ("sub-b1", "lesson-b"),
                ("sub-c1", "lesson-c"),
            ]),
        }
    }
}

#[async_trait]
impl ContentDirectory for StaticContent {
    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Option<LessonInfo>> {
        Ok(self.lessons.get(lesson_id).map(|subject_id| LessonInfo {
            id: lesson_id.to_string(),
            title: format!("Lesson {}", lesson_id),
            subject_id: subject_id.to_string(),
        }))
    }

    async fn find_subject(&self, subject_id: &str) -> AppResult<Option<SubjectInfo>> {
        let name = match subject_id {
            "algebra" => "Algebra",
            "biology" => "Biology",
            _ => return Ok(None),
        };
        Ok(Some(SubjectInfo {
            id: subject_id.to_string(),
            name: name.to_string(),
        }))
    }

    async fn find_sub_bab(&self, sub_bab_id: &str) -> AppResult<Option<SubBabInfo>> {
        Ok(self.sub_babs.get(sub_bab_id).map(|lesson_id| SubBabInfo {
            id: sub_bab_id.to_string(),
            lesson_id: lesson_id.to_string(),
            title: String::new(),
        }))
    }
}

pub struct StaticStudents;

#[async_trait]
impl StudentDirectory for StaticStudents {
    async fn student_name(&self, student_id: &str) -> AppResult<Option<String>> {
        Ok((student_id == STUDENT).then(|| "Budi Santoso".to_string()))
    }
}

pub fn app_with(config: Config, store: ProgressStore) -> AppState {
    let collaborators = Collaborators {
        content: Arc::new(StaticContent::new()),
        students: Arc::new(StaticStudents),
        identity: Arc::new(StaticIdentity::signed_in(STUDENT)),
        notifier: Arc::new(LogNotifier),
    };
    AppState::from_parts(config, store, collaborators).expect("app state should build")
}

pub fn app() -> AppState {
    app_with(Config::test_config(), ProgressStore::in_memory())
}

/// Two multiple-choice questions (correct option 2) and one essay question.
pub fn mixed_quiz() -> Quiz {
    let question = |id: &str, question_type| QuizQuestion {
        id: id.to_string(),
        question: format!("Question {}", id),
        options: vec!["a".into(), "b".into(), "c".into()],
        correct_answer: 2,
        question_type,
        explanation: String::new(),
    };
    Quiz {
        id: "quiz-a1".to_string(),
        sub_bab_id: "sub-a1".to_string(),
        title: "Linear equations".to_string(),
        description: String::new(),
        questions: vec![
            question("q1", QuestionType::MultipleChoice),
            question("q2", QuestionType::MultipleChoice),
            question("q3", QuestionType::Essay),
        ],
        passing_score: 70.0,
        time_limit: 15,
    }
}
