use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, COLLECTION_NAME, DATABASE_NAME};
use crate::models::comic::{Comic, ComicId, ComicPatch};
use crate::models::error::StoreError;
use crate::services::store::ComicStore;

const DUPLICATE_KEY: i32 = 11000;

/// Stored shape of a comic: same fields as the wire record, but with `_id`
/// kept as a native ObjectId.
#[derive(Debug, Serialize, Deserialize)]
struct ComicDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(rename = "onSaleDate")]
    on_sale_date: String,
    image: String,
}

impl From<&Comic> for ComicDocument {
    fn from(comic: &Comic) -> Self {
        ComicDocument {
            id: comic.id.as_object_id(),
            title: comic.title.clone(),
            on_sale_date: comic.on_sale_date.clone(),
            image: comic.image.clone(),
        }
    }
}

impl From<ComicDocument> for Comic {
    fn from(doc: ComicDocument) -> Self {
        Comic {
            id: doc.id.into(),
            title: doc.title,
            on_sale_date: doc.on_sale_date,
            image: doc.image,
        }
    }
}

fn set_fields(patch: &ComicPatch) -> Document {
    let mut fields = Document::new();
    if let Some(title) = &patch.title {
        fields.insert("title", title.as_str());
    }
    if let Some(on_sale_date) = &patch.on_sale_date {
        fields.insert("onSaleDate", on_sale_date.as_str());
    }
    if let Some(image) = &patch.image {
        fields.insert("image", image.as_str());
    }
    fields
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

pub struct MongoComicStore {
    client: Client,
    comics: Collection<ComicDocument>,
}

impl MongoComicStore {
    /// Builds the driver client. The driver connects lazily, so an unreachable
    /// server surfaces on the first request rather than here.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongodb_url).await?;
        let comics = client
            .database(DATABASE_NAME)
            .collection::<ComicDocument>(COLLECTION_NAME);

        tracing::info!(
            database = DATABASE_NAME,
            collection = COLLECTION_NAME,
            "MongoDB client ready"
        );

        Ok(MongoComicStore { client, comics })
    }
}

#[rocket::async_trait]
impl ComicStore for MongoComicStore {
    async fn insert(&self, comic: &Comic) -> Result<ComicId, StoreError> {
        let result = self
            .comics
            .insert_one(ComicDocument::from(comic), None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateId(comic.id)
                } else {
                    StoreError::Driver(e)
                }
            })?;

        result
            .inserted_id
            .as_object_id()
            .map(ComicId::from)
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))
    }

    async fn find_by_id(&self, id: &ComicId) -> Result<Option<Comic>, StoreError> {
        let found = self
            .comics
            .find_one(doc! { "_id": id.as_object_id() }, None)
            .await?;
        Ok(found.map(Comic::from))
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<Comic>, StoreError> {
        let options = FindOptions::builder().limit(limit as i64).build();
        let cursor = self.comics.find(None, options).await?;
        let docs: Vec<ComicDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Comic::from).collect())
    }

    async fn update_fields(&self, id: &ComicId, patch: &ComicPatch) -> Result<u64, StoreError> {
        let result = self
            .comics
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": set_fields(patch) },
                None,
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: &ComicId) -> Result<u64, StoreError> {
        let result = self
            .comics
            .delete_one(doc! { "_id": id.as_object_id() }, None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn close(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fields_only_includes_present_values() {
        let patch = ComicPatch {
            title: Some("Y".to_string()),
            image: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(set_fields(&patch), doc! { "title": "Y", "image": "" });
        assert!(set_fields(&ComicPatch::default()).is_empty());
    }

    #[test]
    fn test_document_conversion_keeps_native_id() {
        let comic = Comic {
            id: ComicId::new(),
            title: "X".to_string(),
            on_sale_date: "2029-01-01T00:00:00-0500".to_string(),
            image: String::new(),
        };

        let stored = ComicDocument::from(&comic);
        assert_eq!(stored.id, comic.id.as_object_id());

        let bson = mongodb::bson::to_document(&stored).unwrap();
        assert!(bson.get_object_id("_id").is_ok());
        assert_eq!(bson.get_str("onSaleDate").unwrap(), "2029-01-01T00:00:00-0500");

        assert_eq!(Comic::from(stored), comic);
    }
}
