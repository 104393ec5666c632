use async_trait::async_trait;

use crate::models::{MemorialDocument, MemorialInput, NewWill, WillDocument, WillUpdate};
use crate::types::Result;

/// Owner-scoped access to stored documents.
///
/// Every lookup takes the requesting owner. A record that exists but belongs
/// to someone else yields `NotFound`, exactly like a missing one. Lists are
/// ordered newest first.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Check the backing store is reachable
    async fn ping(&self) -> Result<()>;

    async fn list_wills(&self, owner_id: &str) -> Result<Vec<WillDocument>>;

    /// Load a will together with its beneficiaries, assets and witnesses
    async fn get_will(&self, id: &str, owner_id: &str) -> Result<WillDocument>;

    async fn create_will(&self, owner_id: &str, input: NewWill) -> Result<WillDocument>;

    async fn update_will(&self, id: &str, owner_id: &str, update: WillUpdate)
        -> Result<WillDocument>;

    /// Remove a will and everything it owns
    async fn delete_will(&self, id: &str, owner_id: &str) -> Result<()>;

    async fn list_memorials(&self, owner_id: &str) -> Result<Vec<MemorialDocument>>;

    async fn get_memorial(&self, id: &str, owner_id: &str) -> Result<MemorialDocument>;

    async fn create_memorial(&self, owner_id: &str, input: MemorialInput)
        -> Result<MemorialDocument>;

    async fn update_memorial(
        &self,
        id: &str,
        owner_id: &str,
        input: MemorialInput,
    ) -> Result<MemorialDocument>;

    async fn delete_memorial(&self, id: &str, owner_id: &str) -> Result<()>;
}

pub(crate) const WILL_NOT_FOUND: &str = "Will not found";
pub(crate) const MEMORIAL_NOT_FOUND: &str = "Memorial not found";
