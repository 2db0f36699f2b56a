use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppResult;

/// Deterministic document identity for records owned by one student.
pub fn document_key(student_id: &str, entity_id: &str) -> String {
    format!("{}:{}", student_id, entity_id)
}

/// A record stored under a deterministic key with a version used for
/// conditional writes.
pub trait ProgressDocument:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    const COLLECTION: &'static str;
    /// Timestamp field used for "most recent first" listings.
    const ACTIVITY_FIELD: &'static str;

    fn key(&self) -> &str;
    fn version(&self) -> i64;
    fn set_version(&mut self, version: i64);
    fn activity_at(&self) -> DateTime<Utc>;

    fn secondary_indexes() -> Vec<Document> {
        Vec::new()
    }
}

/// The store operations the engine relies on: key lookup, equality filters,
/// ordered retrieval, create and conditional overwrite. Nothing here deletes.
#[async_trait]
pub trait DocumentCollection<T: ProgressDocument>: Send + Sync {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<T>>;

    /// Every document whose fields equal the ones in `filter`.
    async fn find_matching(&self, filter: Document) -> AppResult<Vec<T>>;

    /// Like `find_matching`, newest `ACTIVITY_FIELD` first.
    async fn find_matching_recent_first(&self, filter: Document) -> AppResult<Vec<T>>;

    /// Fails with `AppError::Conflict` when the key is already taken.
    async fn insert(&self, document: &T) -> AppResult<()>;

    /// Overwrites the stored document only while it still carries
    /// `expected_version`; otherwise fails with `AppError::Conflict`.
    async fn replace(&self, document: &T, expected_version: i64) -> AppResult<()>;
}
