//! Memorial records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{self, MAX_FIELD_LEN, MAX_TEXT_LEN};
use crate::types::VaultError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorialDocument {
    pub id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub title: String,
    /// Name of the person being remembered
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub biography: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /memorials` and `PUT /memorials/:id`.
///
/// Updates replace every field, so omitted optional fields are cleared.
/// Both `birthDate` and `birth_date` spellings are accepted, as are plain
/// dates and full RFC 3339 timestamps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorialInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "birth_date", deserialize_with = "flexible_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, alias = "death_date", deserialize_with = "flexible_date")]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl MemorialInput {
    pub fn validate(&self) -> Result<(), VaultError> {
        validation::required("Title", &self.title, MAX_FIELD_LEN)?;
        validation::single_line("Title", &self.title, MAX_FIELD_LEN)?;
        validation::required("Name", &self.name, MAX_FIELD_LEN)?;
        validation::single_line("Name", &self.name, MAX_FIELD_LEN)?;
        if let Some(biography) = &self.biography {
            validation::bounded("Biography", biography, MAX_TEXT_LEN)?;
        }
        validation::max_items("photos", self.photos.len())?;
        for photo in &self.photos {
            validation::required("Photo reference", photo, MAX_TEXT_LEN)?;
        }
        Ok(())
    }

    pub fn into_document(self, id: String, owner_id: &str, now: DateTime<Utc>) -> MemorialDocument {
        MemorialDocument {
            id,
            owner_id: owner_id.to_string(),
            title: self.title,
            name: self.name,
            birth_date: self.birth_date,
            death_date: self.death_date,
            biography: self.biography,
            photos: self.photos,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full-field replacement of an existing memorial
    pub fn apply(self, memorial: &mut MemorialDocument, now: DateTime<Utc>) {
        memorial.title = self.title;
        memorial.name = self.name;
        memorial.birth_date = self.birth_date;
        memorial.death_date = self.death_date;
        memorial.biography = self.biography;
        memorial.photos = self.photos;
        memorial.updated_at = now;
    }
}

fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid date: {}", raw)))
}
