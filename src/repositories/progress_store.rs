use std::sync::Arc;

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{LessonProgress, OverallProgress, QuizResult, SubBabProgress, SubjectProgress},
    repositories::{
        document::DocumentCollection, in_memory::InMemoryCollection,
        mongo_collection::MongoDocumentCollection,
    },
};

/// The five progress collections, behind the store trait.
#[derive(Clone)]
pub struct ProgressStore {
    pub sub_babs: Arc<dyn DocumentCollection<SubBabProgress>>,
    pub lessons: Arc<dyn DocumentCollection<LessonProgress>>,
    pub subjects: Arc<dyn DocumentCollection<SubjectProgress>>,
    pub overall: Arc<dyn DocumentCollection<OverallProgress>>,
    pub quiz_results: Arc<dyn DocumentCollection<QuizResult>>,
}

impl ProgressStore {
    pub async fn mongo(db: &Database) -> AppResult<Self> {
        let sub_babs = MongoDocumentCollection::<SubBabProgress>::new(db);
        let lessons = MongoDocumentCollection::<LessonProgress>::new(db);
        let subjects = MongoDocumentCollection::<SubjectProgress>::new(db);
        let overall = MongoDocumentCollection::<OverallProgress>::new(db);
        let quiz_results = MongoDocumentCollection::<QuizResult>::new(db);

        sub_babs.ensure_indexes().await?;
        lessons.ensure_indexes().await?;
        subjects.ensure_indexes().await?;
        overall.ensure_indexes().await?;
        quiz_results.ensure_indexes().await?;

        Ok(Self {
            sub_babs: Arc::new(sub_babs),
            lessons: Arc::new(lessons),
            subjects: Arc::new(subjects),
            overall: Arc::new(overall),
            quiz_results: Arc::new(quiz_results),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            sub_babs: Arc::new(InMemoryCollection::<SubBabProgress>::new()),
            lessons: Arc::new(InMemoryCollection::<LessonProgress>::new()),
            subjects: Arc::new(InMemoryCollection::<SubjectProgress>::new()),
            overall: Arc::new(InMemoryCollection::<OverallProgress>::new()),
            quiz_results: Arc::new(InMemoryCollection::<QuizResult>::new()),
        }
    }
}
