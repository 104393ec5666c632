//! MongoDB document structures for wills and memorials

mod memorial;
mod metadata;
mod will;

pub use memorial::{MemorialDoc, MEMORIAL_COLLECTION};
pub use metadata::Metadata;
pub use will::{WillDoc, WILL_COLLECTION};
