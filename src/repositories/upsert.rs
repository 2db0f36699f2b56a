use std::sync::Arc;

use crate::{
    errors::AppResult,
    repositories::document::{DocumentCollection, ProgressDocument},
};

/// Single read-modify-write against a document collection.
///
/// The stored version is checked on write, so two writers racing on the same
/// key cannot both succeed: the loser gets `AppError::Conflict` and is
/// expected to re-run the whole step.
pub struct UpsertWriter<T: ProgressDocument> {
    collection: Arc<dyn DocumentCollection<T>>,
}

impl<T: ProgressDocument> UpsertWriter<T> {
    pub fn new(collection: Arc<dyn DocumentCollection<T>>) -> Self {
        Self { collection }
    }

    /// Version stored under `key`, `None` when no record exists yet.
    pub async fn current_version(&self, key: &str) -> AppResult<Option<i64>> {
        let current = self.collection.find_by_key(key).await?;
        Ok(current.as_ref().map(ProgressDocument::version))
    }

    /// Reads the record under `key`, hands it to `change` and writes back
    /// what it returns, creating the record when none exists yet.
    pub async fn modify<F>(&self, key: &str, change: F) -> AppResult<T>
    where
        F: FnOnce(Option<T>) -> AppResult<T>,
    {
        let current = self.collection.find_by_key(key).await?;
        let expected_version = current.as_ref().map(ProgressDocument::version);

        let updated = change(current)?;
        self.write_expecting(expected_version, updated).await
    }

    /// Writes `value` only if the stored record still carries
    /// `expected_version`, or is still absent when that is `None`.
    pub async fn write_expecting(
        &self,
        expected_version: Option<i64>,
        mut value: T,
    ) -> AppResult<T> {
        match expected_version {
            Some(expected) => {
                value.set_version(expected + 1);
                self.collection.replace(&value, expected).await?;
            }
            None => {
                value.set_version(1);
                self.collection.insert(&value).await?;
            }
        }

        Ok(value)
    }

    /// Writes `value` over whatever is stored under its key.
    pub async fn upsert(&self, value: T) -> AppResult<T> {
        let key = value.key().to_string();
        self.modify(&key, |_| Ok(value)).await
    }
}

impl<T: ProgressDocument> Clone for UpsertWriter<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
        }
    }
}
