use async_trait::async_trait;

use crate::{errors::AppResult, models::domain::SubBabProgress};

/// Told when a sub-bab becomes complete for a student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn sub_bab_completed(&self, progress: &SubBabProgress) -> AppResult<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl CompletionNotifier for LogNotifier {
    async fn sub_bab_completed(&self, progress: &SubBabProgress) -> AppResult<()> {
        log::info!(
            "Student {} completed sub-bab {} of lesson {}",
            progress.student_id,
            progress.sub_bab_id,
            progress.lesson_id
        );
        Ok(())
    }
}
