use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::{self, Document};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    repositories::document::{DocumentCollection, ProgressDocument},
};

/// Process-local collection keyed by document identity. Used by tests and by
/// embedders that do not need persistence.
pub struct InMemoryCollection<T: ProgressDocument> {
    documents: Arc<RwLock<BTreeMap<String, T>>>,
}

impl<T: ProgressDocument> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl<T: ProgressDocument> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ProgressDocument> Clone for InMemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
        }
    }
}

/// Equality match over the serialized field names, like a Mongo filter of
/// plain `{ field: value }` pairs.
fn matches_filter<T: ProgressDocument>(document: &T, filter: &Document) -> AppResult<bool> {
    let fields = bson::to_document(document)?;
    Ok(filter
        .iter()
        .all(|(field, expected)| fields.get(field) == Some(expected)))
}

#[async_trait]
impl<T: ProgressDocument> DocumentCollection<T> for InMemoryCollection<T> {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<T>> {
        let documents = self.documents.read().await;
        Ok(documents.get(key).cloned())
    }

    async fn find_matching(&self, filter: Document) -> AppResult<Vec<T>> {
        let documents = self.documents.read().await;
        let mut matching = Vec::new();
        for document in documents.values() {
            if matches_filter(document, &filter)? {
                matching.push(document.clone());
            }
        }
        Ok(matching)
    }

    async fn find_matching_recent_first(&self, filter: Document) -> AppResult<Vec<T>> {
        let mut matching = self.find_matching(filter).await?;
        matching.sort_by(|a, b| b.activity_at().cmp(&a.activity_at()));
        Ok(matching)
    }

    async fn insert(&self, document: &T) -> AppResult<()> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(document.key()) {
            return Err(AppError::Conflict(format!(
                "{} '{}' was created concurrently",
                T::COLLECTION,
                document.key()
            )));
        }
        documents.insert(document.key().to_string(), document.clone());
        Ok(())
    }

    async fn replace(&self, document: &T, expected_version: i64) -> AppResult<()> {
        let mut documents = self.documents.write().await;
        let current_version = documents.get(document.key()).map(|stored| stored.version());

        if current_version != Some(expected_version) {
            return Err(AppError::Conflict(format!(
                "{} '{}' changed since version {}",
                T::COLLECTION,
                document.key(),
                expected_version
            )));
        }

        documents.insert(document.key().to_string(), document.clone());
        Ok(())
    }
}
