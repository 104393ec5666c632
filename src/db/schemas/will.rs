//! Will document schema
//!
//! Beneficiaries, assets and witnesses are embedded in the will document, so
//! they are read in the same fetch and removed with it.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::models::{Asset, Beneficiary, WillDocument, WillStatus, Witness};

/// Collection name for wills
pub const WILL_COLLECTION: &str = "wills";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WillDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub owner_id: String,

    pub title: String,

    pub executor: String,

    #[serde(default)]
    pub status: WillStatus,

    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub witnesses: Vec<Witness>,
}

impl WillDoc {
    pub fn from_document(id: ObjectId, will: WillDocument) -> Self {
        Self {
            _id: Some(id),
            metadata: Metadata::new(will.created_at, will.updated_at),
            owner_id: will.owner_id,
            title: will.title,
            executor: will.executor,
            status: will.status,
            beneficiaries: will.beneficiaries,
            assets: will.assets,
            witnesses: will.witnesses,
        }
    }

    pub fn into_document(self) -> WillDocument {
        WillDocument {
            id: self._id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: self.owner_id,
            title: self.title,
            executor: self.executor,
            status: self.status,
            beneficiaries: self.beneficiaries,
            assets: self.assets,
            witnesses: self.witnesses,
            created_at: self.metadata.created(),
            updated_at: self.metadata.updated(),
        }
    }
}

impl IntoIndexes for WillDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "owner_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("owner_id_index".to_string())
                        .build(),
                ),
            ),
            // Listing query: owner's wills, newest first
            (
                doc! { "owner_id": 1, "metadata.created_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("owner_created_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for WillDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
