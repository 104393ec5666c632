//! `/memorials` JSON endpoints

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Response, StatusCode};
use tracing::info;

use super::request::read_json;
use super::response::{success, success_message, BoxBody};
use crate::models::MemorialInput;
use crate::server::AppState;
use crate::types::Result;

/// GET /memorials
pub async fn list(state: &AppState, owner_id: &str) -> Result<Response<BoxBody>> {
    let memorials = state.store.list_memorials(owner_id).await?;
    Ok(success(StatusCode::OK, memorials))
}

/// POST /memorials
pub async fn create<B>(state: &AppState, owner_id: &str, body: B) -> Result<Response<BoxBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let input: MemorialInput = read_json(body, state.args.max_body_bytes).await?;
    input.validate()?;

    let memorial = state.store.create_memorial(owner_id, input).await?;
    info!(memorial_id = %memorial.id, owner_id, "Memorial created");
    Ok(success(StatusCode::CREATED, memorial))
}

/// GET /memorials/:id
pub async fn get(state: &AppState, owner_id: &str, id: &str) -> Result<Response<BoxBody>> {
    let memorial = state.store.get_memorial(id, owner_id).await?;
    Ok(success(StatusCode::OK, memorial))
}

/// PUT /memorials/:id. Replaces every field.
pub async fn update<B>(
    state: &AppState,
    owner_id: &str,
    id: &str,
    body: B,
) -> Result<Response<BoxBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let input: MemorialInput = read_json(body, state.args.max_body_bytes).await?;
    input.validate()?;

    let memorial = state.store.update_memorial(id, owner_id, input).await?;
    info!(memorial_id = %memorial.id, owner_id, "Memorial updated");
    Ok(success(StatusCode::OK, memorial))
}

/// DELETE /memorials/:id
pub async fn delete(state: &AppState, owner_id: &str, id: &str) -> Result<Response<BoxBody>> {
    state.store.delete_memorial(id, owner_id).await?;
    info!(memorial_id = id, owner_id, "Memorial deleted");
    Ok(success_message("Memorial deleted successfully"))
}
