//! PDF generation endpoints
//!
//! Each request runs four stages in order: fetch the owner's record,
//! assemble layout blocks, render the complete PDF, then deliver it. Every
//! failure before delivery becomes an ordinary JSON error response.

use chrono::Utc;
use hyper::Response;
use tracing::info;

use super::delivery::pdf_response;
use super::response::BoxBody;
use crate::document::{assemble_memorial, assemble_will, memorial_filename, will_filename, Block};
use crate::render::{render_document, RenderConfig, RenderedDocument};
use crate::server::AppState;
use crate::types::{Result, VaultError};

/// GET /wills/:id/pdf
pub async fn will_pdf(state: &AppState, owner_id: &str, id: &str) -> Result<Response<BoxBody>> {
    let will = state.store.get_will(id, owner_id).await?;

    let blocks = assemble_will(&will, Utc::now().date_naive());
    let block_count = blocks.len();
    let document = render_blocking(blocks, state.render_config, will.title.clone()).await?;

    info!(
        will_id = %will.id,
        blocks = block_count,
        pages = document.page_count,
        bytes = document.bytes.len(),
        "Generated will document"
    );

    pdf_response(
        document.bytes,
        &will_filename(&will.id),
        format!("will {}", will.id),
    )
}

/// GET /memorials/:id/pdf
pub async fn memorial_pdf(
    state: &AppState,
    owner_id: &str,
    id: &str,
) -> Result<Response<BoxBody>> {
    let memorial = state.store.get_memorial(id, owner_id).await?;

    let blocks = assemble_memorial(&memorial);
    let block_count = blocks.len();
    let document = render_blocking(blocks, state.render_config, memorial.title.clone()).await?;

    info!(
        memorial_id = %memorial.id,
        blocks = block_count,
        pages = document.page_count,
        bytes = document.bytes.len(),
        "Generated memorial document"
    );

    pdf_response(
        document.bytes,
        &memorial_filename(&memorial.name),
        format!("memorial {}", memorial.id),
    )
}

/// Rendering is CPU-bound; keep it off the connection tasks.
async fn render_blocking(
    blocks: Vec<Block>,
    config: RenderConfig,
    title: String,
) -> Result<RenderedDocument> {
    tokio::task::spawn_blocking(move || render_document(&blocks, &config, &title))
        .await
        .map_err(|e| VaultError::Internal(format!("Render task failed: {}", e)))?
}
