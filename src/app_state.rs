use std::sync::Arc;

use crate::{
    auth::IdentityProvider,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ContentDirectory, MongoContentDirectory, MongoStudentDirectory, ProgressStore,
        StudentDirectory,
    },
    services::{
        CompletionNotifier, LogNotifier, ProgressCascade, ProgressQueryService,
        QuizScoringEngine, SubBabProgressManager,
    },
};

/// External systems the engine consults but does not own.
#[derive(Clone)]
pub struct Collaborators {
    pub content: Arc<dyn ContentDirectory>,
    pub students: Arc<dyn StudentDirectory>,
    pub identity: Arc<dyn IdentityProvider>,
    pub notifier: Arc<dyn CompletionNotifier>,
}

#[derive(Clone)]
pub struct AppState {
    pub progress: Arc<SubBabProgressManager>,
    pub quizzes: Arc<QuizScoringEngine>,
    pub cascade: Arc<ProgressCascade>,
    pub queries: Arc<ProgressQueryService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connects to MongoDB, ensures indexes and wires the engine with the
    /// Mongo-backed directories.
    pub async fn new(config: Config, identity: Arc<dyn IdentityProvider>) -> AppResult<Self> {
        config.validate()?;
        let db = Database::connect(&config).await?;
        let store = ProgressStore::mongo(&db).await?;

        let collaborators = Collaborators {
            content: Arc::new(MongoContentDirectory::new(&db)),
            students: Arc::new(MongoStudentDirectory::new(&db)),
            identity,
            notifier: Arc::new(LogNotifier),
        };

        Self::from_parts(config, store, collaborators)
    }

    pub fn from_parts(
        config: Config,
        store: ProgressStore,
        collaborators: Collaborators,
    ) -> AppResult<Self> {
        let tracked_materials = config.tracked_materials()?;
        let write_policy = config.progress_write_policy();

        let cascade = Arc::new(ProgressCascade::new(
            &store,
            Arc::clone(&collaborators.content),
            collaborators.students,
            write_policy,
        ));
        let progress = Arc::new(SubBabProgressManager::new(
            &store,
            Arc::clone(&cascade),
            collaborators.notifier,
            tracked_materials,
            write_policy,
        ));
        let quizzes = Arc::new(QuizScoringEngine::new(
            &store,
            Arc::clone(&progress),
            collaborators.content,
            collaborators.identity,
            write_policy,
        ));
        let queries = Arc::new(ProgressQueryService::new(Arc::clone(&cascade)));

        Ok(Self {
            progress,
            quizzes,
            cascade,
            queries,
            config: Arc::new(config),
        })
    }
}
