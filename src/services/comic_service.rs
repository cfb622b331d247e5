use std::sync::Arc;

use serde_json::Value;

use crate::models::comic::{self, Comic, ComicId};
use crate::models::error::{ComicError, StoreError};
use crate::services::store::ComicStore;

/// Most comics a single list call returns.
pub const LIST_LIMIT: usize = 1000;

pub struct ComicService {
    store: Arc<dyn ComicStore>,
}

impl ComicService {
    pub fn new(store: Arc<dyn ComicStore>) -> Self {
        ComicService { store }
    }

    pub async fn create_comic(&self, payload: &Value) -> Result<Comic, ComicError> {
        let comic = comic::validate_create(payload)?;
        let id = self.store.insert(&comic).await?;
        tracing::debug!(%id, "Inserted comic");

        // Read back what the store actually holds.
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| StoreError::Vanished(id).into())
    }

    pub async fn list_comics(&self) -> Result<Vec<Comic>, ComicError> {
        Ok(self.store.find_all(LIST_LIMIT).await?)
    }

    pub async fn get_comic(&self, raw_id: &str) -> Result<Comic, ComicError> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| not_found(raw_id))
    }

    /// Applies the present fields of `payload`. A no-op update, whether empty or
    /// identical to what is stored, still answers with the current record.
    pub async fn update_comic(&self, raw_id: &str, payload: &Value) -> Result<Comic, ComicError> {
        let patch = comic::validate_update(payload)?;
        let id = parse_id(raw_id)?;

        if !patch.is_empty() {
            let modified = self.store.update_fields(&id, &patch).await?;
            if modified == 1 {
                if let Some(updated) = self.store.find_by_id(&id).await? {
                    return Ok(updated);
                }
            }
            tracing::debug!(%id, modified, "Update changed nothing, re-checking");
        }

        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| not_found(raw_id))
    }

    pub async fn delete_comic(&self, raw_id: &str) -> Result<(), ComicError> {
        let id = parse_id(raw_id)?;
        match self.store.delete(&id).await? {
            1 => Ok(()),
            _ => Err(not_found(raw_id)),
        }
    }
}

// A malformed id can never match a stored comic, so it answers the same as an
// unknown one without touching the store.
fn parse_id(raw_id: &str) -> Result<ComicId, ComicError> {
    raw_id.parse().map_err(|_| not_found(raw_id))
}

fn not_found(raw_id: &str) -> ComicError {
    ComicError::NotFound(raw_id.to_string())
}
