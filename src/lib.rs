//! Legacy Vault - wills and memorials with PDF document generation
//!
//! Owners keep wills (with beneficiaries, assets and witnesses) and
//! memorials behind a token-authenticated JSON API, and download either as a
//! generated PDF.
//!
//! ## Pipeline
//!
//! - **document**: turns a loaded record into ordered layout blocks
//! - **render**: lays blocks out onto paginated PDF pages
//! - **routes::delivery**: sends the finished bytes as an attachment

pub mod auth;
pub mod config;
pub mod db;
pub mod document;
pub mod logging;
pub mod models;
pub mod render;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{Result, VaultError};
