pub mod aggregation;
pub mod lesson_progress_service;
pub mod notifier;
pub mod overall_progress_service;
pub mod progress_cascade;
pub mod progress_query_service;
pub mod quiz_scoring_service;
pub mod retry;
pub mod sub_bab_progress_service;
pub mod subject_progress_service;

pub use lesson_progress_service::LessonProgressAggregator;
pub use notifier::{CompletionNotifier, LogNotifier};
pub use overall_progress_service::OverallProgressAggregator;
pub use progress_cascade::ProgressCascade;
pub use progress_query_service::ProgressQueryService;
pub use quiz_scoring_service::{calculate_quiz_scores, QuizScoringEngine};
pub use retry::{retry, RetryOn, RetryPolicy};
pub use sub_bab_progress_service::SubBabProgressManager;
pub use subject_progress_service::SubjectProgressAggregator;
