use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, InsertManyOptions, ReturnDocument},
    Collection,
};

use crate::{
    document::query_by_id,
    error::is_duplicate_key,
    DbError, PosterDocument, PosterPatch, PosterStore,
};

/// [`PosterStore`] backed by a MongoDB collection.
#[derive(Clone, Debug)]
pub struct MongoPosterStore {
    collection: Collection<PosterDocument>,
}

impl MongoPosterStore {
    pub fn new(collection: Collection<PosterDocument>) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection<PosterDocument> {
        &self.collection
    }

    fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

#[async_trait]
impl PosterStore for MongoPosterStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn drop_all(&self) -> Result<(), DbError> {
        tracing::debug!(target: "posters-db", ns = %self.namespace(), "dropping collection");
        // The driver treats a missing namespace as success.
        self.collection.drop(None).await?;
        Ok(())
    }

    async fn insert_many(&self, posters: &[PosterDocument]) -> Result<(), DbError> {
        if posters.is_empty() {
            return Ok(());
        }

        let options = InsertManyOptions::builder().ordered(true).build();
        match self.collection.insert_many(posters, options).await {
            Ok(result) => {
                tracing::debug!(
                    target: "posters-db",
                    inserted = result.inserted_ids.len(),
                    "bulk insert complete"
                );
                Ok(())
            }
            Err(err) if is_duplicate_key(&err) => {
                Err(DbError::DuplicateKey(first_duplicate(&err, posters)))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn count(&self) -> Result<u64, DbError> {
        Ok(self.collection.count_documents(None, None).await?)
    }

    async fn find_all(&self) -> Result<Vec<PosterDocument>, DbError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PosterDocument>, DbError> {
        Ok(self.collection.find_one(query_by_id(id), None).await?)
    }

    async fn insert(&self, poster: &PosterDocument) -> Result<(), DbError> {
        match self.collection.insert_one(poster, None).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(DbError::DuplicateKey(poster.id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    async fn update(
        &self,
        id: &str,
        patch: &PosterPatch,
    ) -> Result<Option<PosterDocument>, DbError> {
        let Some(update) = patch.to_update() else {
            return self.find_by_id(id).await;
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(query_by_id(id), update, options)
            .await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = self.collection.delete_one(query_by_id(id), None).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Id of the first rejected document of an ordered bulk insert.
fn first_duplicate(err: &mongodb::error::Error, posters: &[PosterDocument]) -> String {
    use mongodb::error::ErrorKind;

    let index = match err.kind.as_ref() {
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.index),
        _ => None,
    };

    index
        .and_then(|i| posters.get(i))
        .or_else(|| posters.first())
        .map(|p| p.id.clone())
        .unwrap_or_default()
}
