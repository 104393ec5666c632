//! `/wills` JSON endpoints

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Response, StatusCode};
use tracing::info;

use super::request::read_json;
use super::response::{success, success_message, BoxBody};
use crate::models::{NewWill, WillUpdate};
use crate::server::AppState;
use crate::types::Result;

/// GET /wills
pub async fn list(state: &AppState, owner_id: &str) -> Result<Response<BoxBody>> {
    let wills = state.store.list_wills(owner_id).await?;
    Ok(success(StatusCode::OK, wills))
}

/// POST /wills
pub async fn create<B>(state: &AppState, owner_id: &str, body: B) -> Result<Response<BoxBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let input: NewWill = read_json(body, state.args.max_body_bytes).await?;
    input.validate()?;

    let will = state.store.create_will(owner_id, input).await?;
    info!(will_id = %will.id, owner_id, "Will created");
    Ok(success(StatusCode::CREATED, will))
}

/// GET /wills/:id
pub async fn get(state: &AppState, owner_id: &str, id: &str) -> Result<Response<BoxBody>> {
    let will = state.store.get_will(id, owner_id).await?;
    Ok(success(StatusCode::OK, will))
}

/// PUT /wills/:id
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
    let update: WillUpdate = read_json(body, state.args.max_body_bytes).await?;
    update.validate()?;

    let will = state.store.update_will(id, owner_id, update).await?;
    info!(will_id = %will.id, owner_id, "Will updated");
    Ok(success(StatusCode::OK, will))
}

/// DELETE /wills/:id
pub async fn delete(state: &AppState, owner_id: &str, id: &str) -> Result<Response<BoxBody>> {
    state.store.delete_will(id, owner_id).await?;
    info!(will_id = id, owner_id, "Will deleted");
    Ok(success_message("Will deleted successfully"))
}
