//! Persistence for wills and memorials
//!
//! Handlers talk to a [`DocumentStore`]; MongoDB backs production and a
//! process-local map backs development and tests.

pub mod memory;
pub mod mongo;
pub mod mongo_store;
pub mod schemas;
mod store;

pub use memory::MemoryStore;
pub use mongo::{IntoIndexes, MongoClient, MongoCollection, MutMetadata};
pub use mongo_store::MongoStore;
pub use store::DocumentStore;
