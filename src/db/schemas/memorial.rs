//! Memorial document schema

use bson::{doc, oid::ObjectId, Document};
use chrono::NaiveDate;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::models::MemorialDocument;

/// Collection name for memorials
pub const MEMORIAL_COLLECTION: &str = "memorials";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MemorialDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub owner_id: String,

    pub title: String,

    /// Name of the person being remembered
    pub name: String,

    #[serde(default)]
    pub birth_date: Option<NaiveDate>,

    #[serde(default)]
    pub death_date: Option<NaiveDate>,

    #[serde(default)]
    pub biography: Option<String>,

    #[serde(default)]
    pub photos: Vec<String>,
}

impl MemorialDoc {
    pub fn from_document(id: ObjectId, memorial: MemorialDocument) -> Self {
        Self {
            _id: Some(id),
            metadata: Metadata::new(memorial.created_at, memorial.updated_at),
            owner_id: memorial.owner_id,
            title: memorial.title,
            name: memorial.name,
            birth_date: memorial.birth_date,
            death_date: memorial.death_date,
            biography: memorial.biography,
            photos: memorial.photos,
        }
    }

    pub fn into_document(self) -> MemorialDocument {
        MemorialDocument {
            id: self._id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: self.owner_id,
            title: self.title,
            name: self.name,
            birth_date: self.birth_date,
            death_date: self.death_date,
            biography: self.biography,
            photos: self.photos,
            created_at: self.metadata.created(),
            updated_at: self.metadata.updated(),
        }
    }
}

impl IntoIndexes for MemorialDoc {
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

impl MutMetadata for MemorialDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
