//! Will records and their owned collections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::{self, MAX_FIELD_LEN};
use crate::types::VaultError;

pub const DEFAULT_WILL_TITLE: &str = "Last Will and Testament";
pub const DEFAULT_EXECUTOR: &str = "Not specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WillStatus {
    #[default]
    Draft,
    Completed,
    Executed,
}

/// A will together with its beneficiaries, assets and witnesses.
///
/// The child collections are owned by the will: they are stored with it and
/// removed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WillDocument {
    pub id: String,
    #[serde(rename = "userId")]
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub address: String,
    /// Share of the estate, 0-100. The sum across a will is not checked.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Property,
    Vehicle,
    BankAccount,
    Investment,
    Other,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Property => write!(f, "property"),
            AssetType::Vehicle => write!(f, "vehicle"),
            AssetType::BankAccount => write!(f, "bank_account"),
            AssetType::Investment => write!(f, "investment"),
            AssetType::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Monetary value in KES, kept at full precision
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub name: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub phone: String,
}

impl Beneficiary {
    pub fn validate(&self) -> Result<(), VaultError> {
        validation::required("Beneficiary name", &self.name, MAX_FIELD_LEN)?;
        validation::single_line("Beneficiary email", &self.email, MAX_FIELD_LEN)?;
        validation::single_line("Beneficiary phone", &self.phone, MAX_FIELD_LEN)?;
        validation::single_line("Beneficiary relationship", &self.relationship, MAX_FIELD_LEN)?;
        validation::bounded("Beneficiary address", &self.address, MAX_FIELD_LEN)?;
        if !self.percentage.is_finite() || !(0.0..=100.0).contains(&self.percentage) {
            return Err(VaultError::Validation(
                "Beneficiary percentage must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

impl Asset {
    pub fn validate(&self) -> Result<(), VaultError> {
        validation::required("Asset name", &self.name, MAX_FIELD_LEN)?;
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(VaultError::Validation(
                "Asset value must be a non-negative number".into(),
            ));
        }
        if let Some(location) = &self.location {
            validation::bounded("Asset location", location, MAX_FIELD_LEN)?;
        }
        Ok(())
    }
}

impl Witness {
    pub fn validate(&self) -> Result<(), VaultError> {
        validation::required("Witness name", &self.name, MAX_FIELD_LEN)?;
        validation::single_line("Witness ID number", &self.id_number, MAX_FIELD_LEN)?;
        validation::single_line("Witness phone", &self.phone, MAX_FIELD_LEN)?;
        Ok(())
    }
}

fn validate_children(
    beneficiaries: &[Beneficiary],
    assets: &[Asset],
    witnesses: &[Witness],
) -> Result<(), VaultError> {
    validation::max_items("beneficiaries", beneficiaries.len())?;
    validation::max_items("assets", assets.len())?;
    validation::max_items("witnesses", witnesses.len())?;
    beneficiaries.iter().try_for_each(Beneficiary::validate)?;
    assets.iter().try_for_each(Asset::validate)?;
    witnesses.iter().try_for_each(Witness::validate)?;
    Ok(())
}

/// Body of `POST /wills`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWill {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,
    #[serde(default)]
    pub status: Option<WillStatus>,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub witnesses: Vec<Witness>,
}

impl NewWill {
    pub fn validate(&self) -> Result<(), VaultError> {
        if let Some(title) = &self.title {
            validation::single_line("Title", title, MAX_FIELD_LEN)?;
        }
        if let Some(executor) = &self.executor {
            validation::single_line("Executor", executor, MAX_FIELD_LEN)?;
        }
        validate_children(&self.beneficiaries, &self.assets, &self.witnesses)
    }

    /// Build the stored record. Blank title and executor fall back to defaults.
    pub fn into_document(self, id: String, owner_id: &str, now: DateTime<Utc>) -> WillDocument {
        WillDocument {
            id,
            owner_id: owner_id.to_string(),
            title: non_blank(self.title).unwrap_or_else(|| DEFAULT_WILL_TITLE.to_string()),
            executor: non_blank(self.executor).unwrap_or_else(|| DEFAULT_EXECUTOR.to_string()),
            status: self.status.unwrap_or_default(),
            beneficiaries: self.beneficiaries,
            assets: self.assets,
            witnesses: self.witnesses,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /wills/:id`. Only the supplied fields are replaced; a
/// supplied collection replaces the whole collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WillUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,
    #[serde(default)]
    pub status: Option<WillStatus>,
    #[serde(default)]
    pub beneficiaries: Option<Vec<Beneficiary>>,
    #[serde(default)]
    pub assets: Option<Vec<Asset>>,
    #[serde(default)]
    pub witnesses: Option<Vec<Witness>>,
}

impl WillUpdate {
    pub fn validate(&self) -> Result<(), VaultError> {
        if let Some(title) = &self.title {
            validation::required("Title", title, MAX_FIELD_LEN)?;
            validation::single_line("Title", title, MAX_FIELD_LEN)?;
        }
        if let Some(executor) = &self.executor {
            validation::required("Executor", executor, MAX_FIELD_LEN)?;
            validation::single_line("Executor", executor, MAX_FIELD_LEN)?;
        }
        validate_children(
            self.beneficiaries.as_deref().unwrap_or_default(),
            self.assets.as_deref().unwrap_or_default(),
            self.witnesses.as_deref().unwrap_or_default(),
        )
    }

    pub fn apply(self, will: &mut WillDocument, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            will.title = title;
        }
        if let Some(executor) = self.executor {
            will.executor = executor;
        }
        if let Some(status) = self.status {
            will.status = status;
        }
        if let Some(beneficiaries) = self.beneficiaries {
            will.beneficiaries = beneficiaries;
        }
        if let Some(assets) = self.assets {
            will.assets = assets;
        }
        if let Some(witnesses) = self.witnesses {
            will.witnesses = witnesses;
        }
        will.updated_at = now;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
