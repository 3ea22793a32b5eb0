use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{DbError, PosterDocument, PosterPatch, PosterStore};

/// In-process [`PosterStore`] with the same semantics as the MongoDB backend.
/// Used by tests and by `serve --memory` for local runs.
#[derive(Debug, Default)]
pub struct MemoryPosterStore {
    posters: RwLock<Vec<PosterDocument>>,
}

impl MemoryPosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `posters`, keeping the first of any repeated id.
    pub fn with_posters(posters: impl IntoIterator<Item = PosterDocument>) -> Self {
        let mut unique: Vec<PosterDocument> = Vec::new();
        for poster in posters {
            if !unique.iter().any(|p| p.id == poster.id) {
                unique.push(poster);
            }
        }

        Self {
            posters: RwLock::new(unique),
        }
    }
}

#[async_trait]
impl PosterStore for MemoryPosterStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn drop_all(&self) -> Result<(), DbError> {
        self.posters.write().await.clear();
        Ok(())
    }

    async fn insert_many(&self, posters: &[PosterDocument]) -> Result<(), DbError> {
        let mut stored = self.posters.write().await;
        for poster in posters {
            if stored.iter().any(|p| p.id == poster.id) {
                return Err(DbError::DuplicateKey(poster.id.clone()));
            }
            stored.push(poster.clone());
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, DbError> {
        Ok(self.posters.read().await.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<PosterDocument>, DbError> {
        Ok(self.posters.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PosterDocument>, DbError> {
        Ok(self
            .posters
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, poster: &PosterDocument) -> Result<(), DbError> {
        self.insert_many(std::slice::from_ref(poster)).await
    }

    async fn update(
        &self,
        id: &str,
        patch: &PosterPatch,
    ) -> Result<Option<PosterDocument>, DbError> {
        let mut stored = self.posters.write().await;
        Ok(stored.iter_mut().find(|p| p.id == id).map(|poster| {
            patch.apply(poster);
            poster.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let mut stored = self.posters.write().await;
        let before = stored.len();
        stored.retain(|p| p.id != id);
        Ok(stored.len() < before)
    }
}
