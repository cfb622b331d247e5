use crate::models::comic::{Comic, ComicId, ComicPatch};
use crate::models::error::StoreError;

/// Single point of contact with the document store.
///
/// Every call is one round trip touching at most one document (apart from
/// `find_all`), with no batching and no transactions.
#[rocket::async_trait]
pub trait ComicStore: Send + Sync {
    /// Stores a new comic and returns the identifier it was saved under.
    async fn insert(&self, comic: &Comic) -> Result<ComicId, StoreError>;

    /// Returns `None` rather than an error when nothing matches.
    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, StoreError>;

    /// Up to `limit` comics in storage order. Order is not stable across calls.
    async fn find_all(&self, limit: usize) -> Result<Vec<Comic>, StoreError>;

    /// Merges `patch` into the stored comic and returns how many documents
    /// actually changed: 0 for an unknown id or when every value already matched.
    async fn update_fields(&self, id: &ComicId, patch: &ComicPatch) -> Result<u64, StoreError>;

    async fn delete(&self, id: &ComicId) -> Result<u64, StoreError>;

    async fn close(&self) {}
}
