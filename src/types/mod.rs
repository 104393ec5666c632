//! Shared types for Legacy Vault

mod error;

pub use error::{ErrorEnvelope, Result, VaultError};
