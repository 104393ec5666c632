//! Domain records and the input schemas validated at the HTTP boundary

mod memorial;
pub mod validation;
mod will;

pub use memorial::{MemorialDocument, MemorialInput};
pub use will::{
    Asset, AssetType, Beneficiary, NewWill, WillDocument, WillStatus, WillUpdate, Witness,
    DEFAULT_EXECUTOR, DEFAULT_WILL_TITLE,
};
