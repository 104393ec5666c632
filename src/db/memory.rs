//! In-process document store
//!
//! Backs development mode and the test suite. Contents are lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

use super::store::{DocumentStore, MEMORIAL_NOT_FOUND, WILL_NOT_FOUND};
use crate::models::{MemorialDocument, MemorialInput, NewWill, WillDocument, WillUpdate};
use crate::types::{Result, VaultError};

/// Stored record plus its insertion sequence, used to order records created
/// within the same clock tick.
struct Entry<T> {
    seq: u64,
    doc: T,
}

/// Thread-safe map-backed store
#[derive(Default)]
pub struct MemoryStore {
    wills: DashMap<String, Entry<WillDocument>>,
    memorials: DashMap<String, Entry<MemorialDocument>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

trait Record: Clone {
    fn owner_id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for WillDocument {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for MemorialDocument {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Records belonging to `owner_id`, newest first
fn owned<T: Record>(map: &DashMap<String, Entry<T>>, owner_id: &str) -> Vec<T> {
    let mut rows: Vec<(u64, T)> = map
        .iter()
        .filter(|entry| entry.doc.owner_id() == owner_id)
        .map(|entry| (entry.seq, entry.doc.clone()))
        .collect();
    rows.sort_by(|(seq_a, a), (seq_b, b)| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| seq_b.cmp(seq_a))
    });
    rows.into_iter().map(|(_, doc)| doc).collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_wills(&self, owner_id: &str) -> Result<Vec<WillDocument>> {
        Ok(owned(&self.wills, owner_id))
    }

    async fn get_will(&self, id: &str, owner_id: &str) -> Result<WillDocument> {
        self.wills
            .get(id)
            .filter(|entry| entry.doc.owner_id == owner_id)
            .map(|entry| entry.doc.clone())
            .ok_or_else(|| VaultError::NotFound(WILL_NOT_FOUND.into()))
    }

    async fn create_will(&self, owner_id: &str, input: NewWill) -> Result<WillDocument> {
        let will = input.into_document(Uuid::new_v4().to_string(), owner_id, Utc::now());
        let seq = self.next_seq();
        self.wills.insert(
            will.id.clone(),
            Entry {
                seq,
                doc: will.clone(),
            },
        );
        debug!(will_id = %will.id, "Stored will");
        Ok(will)
    }

    async fn update_will(
        &self,
        id: &str,
        owner_id: &str,
        update: WillUpdate,
    ) -> Result<WillDocument> {
        let mut entry = self
            .wills
            .get_mut(id)
            .filter(|entry| entry.doc.owner_id == owner_id)
            .ok_or_else(|| VaultError::NotFound(WILL_NOT_FOUND.into()))?;
        update.apply(&mut entry.doc, Utc::now());
        Ok(entry.doc.clone())
    }

    async fn delete_will(&self, id: &str, owner_id: &str) -> Result<()> {
        self.wills
            .remove_if(id, |_, entry| entry.doc.owner_id == owner_id)
            .map(|_| ())
            .ok_or_else(|| VaultError::NotFound(WILL_NOT_FOUND.into()))
    }

    async fn list_memorials(&self, owner_id: &str) -> Result<Vec<MemorialDocument>> {
        Ok(owned(&self.memorials, owner_id))
    }

    async fn get_memorial(&self, id: &str, owner_id: &str) -> Result<MemorialDocument> {
        self.memorials
            .get(id)
            .filter(|entry| entry.doc.owner_id == owner_id)
            .map(|entry| entry.doc.clone())
            .ok_or_else(|| VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))
    }

    async fn create_memorial(
        &self,
        owner_id: &str,
        input: MemorialInput,
    ) -> Result<MemorialDocument> {
        let memorial = input.into_document(Uuid::new_v4().to_string(), owner_id, Utc::now());
        let seq = self.next_seq();
        self.memorials.insert(
            memorial.id.clone(),
            Entry {
                seq,
                doc: memorial.clone(),
            },
        );
        debug!(memorial_id = %memorial.id, "Stored memorial");
        Ok(memorial)
    }

    async fn update_memorial(
        &self,
        id: &str,
        owner_id: &str,
        input: MemorialInput,
    ) -> Result<MemorialDocument> {
        let mut entry = self
            .memorials
            .get_mut(id)
            .filter(|entry| entry.doc.owner_id == owner_id)
            .ok_or_else(|| VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))?;
        input.apply(&mut entry.doc, Utc::now());
        Ok(entry.doc.clone())
    }

    async fn delete_memorial(&self, id: &str, owner_id: &str) -> Result<()> {
        self.memorials
            .remove_if(id, |_, entry| entry.doc.owner_id == owner_id)
            .map(|_| ())
            .ok_or_else(|| VaultError::NotFound(MEMORIAL_NOT_FOUND.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Beneficiary, WillStatus};

    fn memorial_input(name: &str) -> MemorialInput {
        MemorialInput {
            title: "In Loving Memory".into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_will_crud() {
        let store = MemoryStore::new();
        let will = store
            .create_will(
                "alice",
                NewWill {
                    executor: Some("Jane Doe".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(will.owner_id, "alice");
        assert_eq!(will.status, WillStatus::Draft);

        let fetched = store.get_will(&will.id, "alice").await.unwrap();
        assert_eq!(fetched, will);

        let updated = store
            .update_will(
                &will.id,
                "alice",
                WillUpdate {
                    status: Some(WillStatus::Completed),
                    beneficiaries: Some(vec![Beneficiary {
                        name: "Alice".into(),
                        email: String::new(),
                        phone: String::new(),
                        relationship: "Daughter".into(),
                        address: String::new(),
                        percentage: 100.0,
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, WillStatus::Completed);
        assert_eq!(updated.executor, "Jane Doe");
        assert_eq!(updated.beneficiaries.len(), 1);

        store.delete_will(&will.id, "alice").await.unwrap();
        assert!(matches!(
            store.get_will(&will.id, "alice").await,
            Err(VaultError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_other_owner_sees_not_found() {
        let store = MemoryStore::new();
        let will = store.create_will("alice", NewWill::default()).await.unwrap();

        let err = store.get_will(&will.id, "mallory").await.unwrap_err();
        let missing = store.get_will("no-such-id", "mallory").await.unwrap_err();
        assert_eq!(err.to_string(), missing.to_string());
        assert!(matches!(err, VaultError::NotFound(_)));

        assert!(store
            .update_will(&will.id, "mallory", WillUpdate::default())
            .await
            .is_err());
        assert!(store.delete_will(&will.id, "mallory").await.is_err());
        // Still there for the real owner
        assert!(store.get_will(&will.id, "alice").await.is_ok());
        assert!(store.list_wills("mallory").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_newest_first() {
        let store = MemoryStore::new();
        for name in ["first", "second", "third"] {
            store
                .create_memorial("alice", memorial_input(name))
                .await
                .unwrap();
        }
        store
            .create_memorial("bob", memorial_input("other"))
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_memorials("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_memorial_update_replaces_fields() {
        let store = MemoryStore::new();
        let mut input = memorial_input("Grace");
        input.biography = Some("Schoolteacher".into());
        let memorial = store.create_memorial("alice", input).await.unwrap();

        let updated = store
            .update_memorial(&memorial.id, "alice", memorial_input("Grace W."))
            .await
            .unwrap();
        assert_eq!(updated.name, "Grace W.");
        assert!(updated.biography.is_none());
        assert!(updated.updated_at >= memorial.updated_at);
    }
}
