use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    repositories::document::{DocumentCollection, ProgressDocument},
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed collection for any progress record type.
pub struct MongoDocumentCollection<T: ProgressDocument> {
    collection: Collection<T>,
}

impl<T: ProgressDocument> MongoDocumentCollection<T> {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(T::COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for {} collection", T::COLLECTION);

        for (position, keys) in T::secondary_indexes().into_iter().enumerate() {
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_secondary_{}", T::COLLECTION, position))
                        .build(),
                )
                .build();
            self.collection.create_index(model).await?;
        }

        log::info!("Successfully created indexes for {} collection", T::COLLECTION);
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Filter for a conditional overwrite. Documents written before versioning
/// have no `version` field and count as version 0.
fn version_filter(key: &str, expected_version: i64) -> Document {
    if expected_version == 0 {
        doc! {
            "_id": key,
            "$or": [
                { "version": 0_i64 },
                { "version": { "$exists": false } },
            ],
        }
    } else {
        doc! { "_id": key, "version": expected_version }
    }
}

#[async_trait]
impl<T: ProgressDocument> DocumentCollection<T> for MongoDocumentCollection<T> {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<T>> {
        let document = self.collection.find_one(doc! { "_id": key }).await?;
        Ok(document)
    }

    async fn find_matching(&self, filter: Document) -> AppResult<Vec<T>> {
        let documents = self.collection.find(filter).await?.try_collect().await?;
        Ok(documents)
    }

    async fn find_matching_recent_first(&self, filter: Document) -> AppResult<Vec<T>> {
        let mut sort = Document::new();
        sort.insert(T::ACTIVITY_FIELD, -1);

        let documents = self
            .collection
            .find(filter)
            .sort(sort)
            .await?
            .try_collect()
            .await?;
        Ok(documents)
    }

    async fn insert(&self, document: &T) -> AppResult<()> {
        match self.collection.insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(AppError::Conflict(format!(
                "{} '{}' was created concurrently",
                T::COLLECTION,
                document.key()
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn replace(&self, document: &T, expected_version: i64) -> AppResult<()> {
        let result = self
            .collection
            .replace_one(version_filter(document.key(), expected_version), document)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "{} '{}' changed since version {}",
                T::COLLECTION,
                document.key(),
                expected_version
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_filter_accepts_unversioned_documents_at_zero() {
        let filter = version_filter("student-1:sub-1", 0);

        assert_eq!(filter.get_str("_id").unwrap(), "student-1:sub-1");
        assert!(filter.get_array("$or").is_ok());
    }

    #[test]
    fn version_filter_pins_exact_version() {
        let filter = version_filter("student-1:sub-1", 4);

        assert_eq!(filter.get_i64("version").unwrap(), 4);
        assert!(filter.get("$or").is_none());
    }
}
