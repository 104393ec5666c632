//! MongoDB client and collection wrapper

use bson::{doc, Document};
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use futures_util::{Stream, TryStreamExt};
use tracing::info;

use crate::db::schemas::Metadata;
use crate::types::VaultError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the server answers a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, VaultError> {
        info!("Connecting to MongoDB");

        // Fail fast instead of hanging on an unreachable server
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| VaultError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };
        mongo.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(mongo)
    }

    pub async fn ping(&self) -> Result<(), VaultError> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| VaultError::Database(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }

    /// Get a typed collection with its indexes applied
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, VaultError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, VaultError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<(), VaultError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| VaultError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, filling in any missing timestamps
    pub async fn insert_one(&self, mut item: T) -> Result<(), VaultError> {
        let metadata = item.mut_metadata();
        let now = bson::DateTime::now();
        metadata.created_at.get_or_insert(now);
        metadata.updated_at.get_or_insert(now);

        self.inner
            .insert_one(item)
            .await
            .map_err(|e| VaultError::Database(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, VaultError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| VaultError::Database(format!("Find failed: {}", e)))
    }

    /// Find every document matching `filter`, in `sort` order
    pub async fn find_many(&self, filter: Document, sort: Document) -> Result<Vec<T>, VaultError> {
        let cursor = self
            .inner
            .find(filter)
            .sort(sort)
            .await
            .map_err(|e| VaultError::Database(format!("Find failed: {}", e)))?;

        collect_documents(cursor).await
    }

    /// Replace the single document matching `filter`.
    /// Returns whether a document matched.
    pub async fn replace_one(&self, filter: Document, item: T) -> Result<bool, VaultError> {
        let result = self
            .inner
            .replace_one(filter, item)
            .await
            .map_err(|e| VaultError::Database(format!("Replace failed: {}", e)))?;
        Ok(result.matched_count > 0)
    }

    /// Permanently remove the single document matching `filter`.
    /// Returns whether a document was removed.
    pub async fn delete_one(&self, filter: Document) -> Result<bool, VaultError> {
        let result = self
            .inner
            .delete_one(filter)
            .await
            .map_err(|e| VaultError::Database(format!("Delete failed: {}", e)))?;
        Ok(result.deleted_count > 0)
    }
}

/// Drain a cursor, failing on the first document that does not decode so a
/// listing is never silently short.
async fn collect_documents<T, E, S>(cursor: S) -> Result<Vec<T>, VaultError>
where
    S: Stream<Item = Result<T, E>>,
    E: std::fmt::Display,
{
    cursor
        .try_collect::<Vec<T>>()
        .await
        .map_err(|e| VaultError::Database(format!("Error reading document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_collect_documents_keeps_order() {
        let cursor = stream::iter(vec![Ok::<_, String>(1), Ok(2), Ok(3)]);
        assert_eq!(collect_documents(cursor).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_collect_documents_fails_on_bad_document() {
        let cursor = stream::iter(vec![
            Ok(1),
            Err("missing field `status`".to_string()),
            Ok(3),
        ]);
        let err = collect_documents(cursor).await.unwrap_err();
        assert!(matches!(err, VaultError::Database(_)));
        assert!(err.to_string().contains("missing field `status`"));
    }
}
