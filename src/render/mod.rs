//! Paginated PDF rendering
//!
//! Turns an ordered block list into a complete, self-contained PDF buffer.
//! Rendering either produces the whole document or fails; partial output is
//! never handed to the delivery layer.

mod config;
mod layout;
mod metrics;
mod pdf;

pub use config::{PageSize, RenderConfig};
pub use pdf::{PdfRenderer, RenderedDocument};

use tracing::debug;

use crate::document::Block;
use crate::types::Result;

/// Render `blocks` in order into a finished PDF.
pub fn render_document(
    blocks: &[Block],
    config: &RenderConfig,
    title: &str,
) -> Result<RenderedDocument> {
    let mut renderer = PdfRenderer::new(*config, title)?;

    for block in blocks {
        if let Err(e) = renderer.write_block(block) {
            renderer.abort();
            return Err(e);
        }
    }

    let document = renderer.finish()?;
    debug!(
        pages = document.page_count,
        bytes = document.bytes.len(),
        "Rendered document"
    );
    Ok(document)
}
