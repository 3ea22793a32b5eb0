use async_trait::async_trait;

use crate::{DbError, PosterDocument, PosterPatch};

/// Storage backend for poster records.
///
/// Implementations keep records keyed by [`PosterDocument::id`] and return
/// them in insertion order.
#[async_trait]
pub trait PosterStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Drops every record. A store that holds nothing is not an error.
    async fn drop_all(&self) -> Result<(), DbError>;

    /// Ordered bulk insert. Stops at the first duplicate id.
    async fn insert_many(&self, posters: &[PosterDocument]) -> Result<(), DbError>;

    async fn count(&self) -> Result<u64, DbError>;

    async fn find_all(&self) -> Result<Vec<PosterDocument>, DbError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PosterDocument>, DbError>;

    /// Inserts one record, failing with [`DbError::DuplicateKey`] if the id exists.
    async fn insert(&self, poster: &PosterDocument) -> Result<(), DbError>;

    /// Applies `patch` and returns the updated record, or `None` for an unknown id.
    async fn update(
        &self,
        id: &str,
        patch: &PosterPatch,
    ) -> Result<Option<PosterDocument>, DbError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, DbError>;
}
