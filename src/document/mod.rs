//! Document assembly: records in, layout blocks out

pub mod assembler;
pub mod blocks;
pub mod format;

pub use assembler::{assemble_memorial, assemble_will};
pub use blocks::{Align, Block, BlockKind, FontWeight, ListItem, TextStyle};
pub use format::{format_kes_amount, memorial_filename, sanitize_filename_component, will_filename};
