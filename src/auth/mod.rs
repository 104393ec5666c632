//! Authentication for Legacy Vault
//!
//! Tokens are issued elsewhere on the platform; this service only verifies
//! them and derives the owning identity for storage lookups.

pub mod jwt;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenInput};
