//! MongoDB-backed document store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use tracing::debug;

use super::mongo::{MongoClient, MongoCollection};
use super::schemas::{MemorialDoc, WillDoc, MEMORIAL_COLLECTION, WILL_COLLECTION};
use super::store::{DocumentStore, MEMORIAL_NOT_FOUND, WILL_NOT_FOUND};
use crate::models::{MemorialDocument, MemorialInput, NewWill, WillDocument, WillUpdate};
use crate::types::{Result, VaultError};

pub struct MongoStore {
    client: MongoClient,
    wills: MongoCollection<WillDoc>,
    memorials: MongoCollection<MemorialDoc>,
}

impl MongoStore {
    /// Connect, ping and make sure the collection indexes exist
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = MongoClient::new(uri, db_name).await?;
        let wills = client.collection::<WillDoc>(WILL_COLLECTION).await?;
        let memorials = client.collection::<MemorialDoc>(MEMORIAL_COLLECTION).await?;
        Ok(Self {
            client,
            wills,
            memorials,
        })
    }
}

/// Timestamps at the precision BSON stores them, so the record returned from
/// a write equals the one read back later.
fn now() -> chrono::DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

/// Filter matching one record of one owner. Ids that are not ObjectIds can
/// never match, so they surface as `NotFound`.
fn owned_filter(id: &str, owner_id: &str, not_found: &str) -> Result<Document> {
    let oid = ObjectId::parse_str(id).map_err(|_| VaultError::NotFound(not_found.into()))?;
    Ok(doc! { "_id": oid, "owner_id": owner_id })
}

fn newest_first() -> Document {
    doc! { "metadata.created_at": -1, "_id": -1 }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    async fn list_wills(&self, owner_id: &str) -> Result<Vec<WillDocument>> {
        let docs = self
            .wills
            .find_many(doc! { "owner_id": owner_id }, newest_first())
            .await?;
        Ok(docs.into_iter().map(WillDoc::into_document).collect())
    }

    async fn get_will(&self, id: &str, owner_id: &str) -> Result<WillDocument> {
        let filter = owned_filter(id, owner_id, WILL_NOT_FOUND)?;
        self.wills
            .find_one(filter)
            .await?
            .map(WillDoc::into_document)
            .ok_or_else(|| VaultError::NotFound(WILL_NOT_FOUND.into()))
    }

    async fn create_will(&self, owner_id: &str, input: NewWill) -> Result<WillDocument> {
        let oid = ObjectId::new();
        let will = input.into_document(oid.to_hex(), owner_id, now());
        self.wills
            .insert_one(WillDoc::from_document(oid, will.clone()))
            .await?;
        debug!(will_id = %will.id, "Inserted will");
        Ok(will)
    }

    async fn update_will(
        &self,
        id: &str,
        owner_id: &str,
        update: WillUpdate,
    ) -> Result<WillDocument> {
        let mut will = self.get_will(id, owner_id).await?;
        update.apply(&mut will, now());

        let oid = ObjectId::parse_str(&will.id)
            .map_err(|_| VaultError::NotFound(WILL_NOT_FOUND.into()))?;
        let filter = owned_filter(id, owner_id, WILL_NOT_FOUND)?;
        if !self
            .wills
            .replace_one(filter, WillDoc::from_document(oid, will.clone()))
            .await?
        {
            // Deleted between the read and the write
            return Err(VaultError::NotFound(WILL_NOT_FOUND.into()));
        }
        Ok(will)
    }

    async fn delete_will(&self, id: &str, owner_id: &str) -> Result<()> {
        let filter = owned_filter(id, owner_id, WILL_NOT_FOUND)?;
        if self.wills.delete_one(filter).await? {
            Ok(())
        } else {
            Err(VaultError::NotFound(WILL_NOT_FOUND.into()))
        }
    }

    async fn list_memorials(&self, owner_id: &str) -> Result<Vec<MemorialDocument>> {
        let docs = self
            .memorials
            .find_many(doc! { "owner_id": owner_id }, newest_first())
            .await?;
        Ok(docs.into_iter().map(MemorialDoc::into_document).collect())
    }

    async fn get_memorial(&self, id: &str, owner_id: &str) -> Result<MemorialDocument> {
        let filter = owned_filter(id, owner_id, MEMORIAL_NOT_FOUND)?;
        self.memorials
            .find_one(filter)
            .await?
            .map(MemorialDoc::into_document)
            .ok_or_else(|| VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))
    }

    async fn create_memorial(
        &self,
        owner_id: &str,
        input: MemorialInput,
    ) -> Result<MemorialDocument> {
        let oid = ObjectId::new();
        let memorial = input.into_document(oid.to_hex(), owner_id, now());
        self.memorials
            .insert_one(MemorialDoc::from_document(oid, memorial.clone()))
            .await?;
        debug!(memorial_id = %memorial.id, "Inserted memorial");
        Ok(memorial)
    }

    async fn update_memorial(
        &self,
        id: &str,
        owner_id: &str,
        input: MemorialInput,
    ) -> Result<MemorialDocument> {
        let mut memorial = self.get_memorial(id, owner_id).await?;
        input.apply(&mut memorial, now());

        let oid = ObjectId::parse_str(&memorial.id)
            .map_err(|_| VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))?;
        let filter = owned_filter(id, owner_id, MEMORIAL_NOT_FOUND)?;
        if !self
            .memorials
            .replace_one(filter, MemorialDoc::from_document(oid, memorial.clone()))
            .await?
        {
            return Err(VaultError::NotFound(MEMORIAL_NOT_FOUND.into()));
        }
        Ok(memorial)
    }

    async fn delete_memorial(&self, id: &str, owner_id: &str) -> Result<()> {
        let filter = owned_filter(id, owner_id, MEMORIAL_NOT_FOUND)?;
        if self.memorials.delete_one(filter).await? {
            Ok(())
        } else {
            Err(VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Round trips against a live server need a running MongoDB instance.

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = owned_filter("not-an-object-id", "alice", WILL_NOT_FOUND).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
        assert_eq!(err.to_string(), WILL_NOT_FOUND);
    }

    #[test]
    fn test_owner_is_part_of_filter() {
        let oid = ObjectId::new();
        let filter = owned_filter(&oid.to_hex(), "alice", WILL_NOT_FOUND).unwrap();
        assert_eq!(filter.get_object_id("_id").unwrap(), oid);
        assert_eq!(filter.get_str("owner_id").unwrap(), "alice");
    }
}
