use tokio::sync::RwLock;

use crate::models::comic::{Comic, ComicId, ComicPatch};
use crate::models::error::StoreError;
use crate::services::store::ComicStore;

/// In-process store keeping comics in insertion order.
#[derive(Default)]
pub struct MemoryComicStore {
    comics: RwLock<Vec<Comic>>,
}

impl MemoryComicStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn count(&self) -> usize {
        self.comics.read().await.len()
    }
}

#[rocket::async_trait]
impl ComicStore for MemoryComicStore {
    async fn insert(&self, comic: &Comic) -> Result<ComicId, StoreError> {
        let mut comics = self.comics.write().await;
        if comics.iter().any(|c| c.id == comic.id) {
            return Err(StoreError::DuplicateId(comic.id));
        }
        comics.push(comic.clone());
        Ok(comic.id)
    }

    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, StoreError> {
        let comics = self.comics.read().await;
        Ok(comics.iter().find(|c| &c.id == id).cloned())
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<Comic>, StoreError> {
        let comics = self.comics.read().await;
        Ok(comics.iter().take(limit).cloned().collect())
    }

    async fn update_fields(&self, id: &ComicId, patch: &ComicPatch) -> Result<u64, StoreError> {
        let mut comics = self.comics.write().await;
        let modified = match comics.iter_mut().find(|c| &c.id == id) {
            Some(comic) => patch.apply_to(comic),
            None => false,
        };
        Ok(modified as u64)
    }

    async fn delete(&self, id: &ComicId) -> Result<u64, StoreError> {
        let mut comics = self.comics.write().await;
        let before = comics.len();
        comics.retain(|c| &c.id != id);
        Ok((before - comics.len()) as u64)
    }
}
