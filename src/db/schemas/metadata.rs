//! Creation and update timestamps shared by every document

use bson::DateTime;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl Metadata {
    pub fn new(created_at: chrono::DateTime<Utc>, updated_at: chrono::DateTime<Utc>) -> Self {
        Self {
            created_at: Some(DateTime::from_chrono(created_at)),
            updated_at: Some(DateTime::from_chrono(updated_at)),
        }
    }

    /// Creation time, or the epoch for documents written without one
    pub fn created(&self) -> chrono::DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::from_millis(0)).to_chrono()
    }

    /// Last update time, falling back to creation time
    pub fn updated(&self) -> chrono::DateTime<Utc> {
        self.updated_at
            .map(DateTime::to_chrono)
            .unwrap_or_else(|| self.created())
    }
}
