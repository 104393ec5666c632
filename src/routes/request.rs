//! Request-side helpers: authentication and bounded JSON bodies

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{self, HeaderMap};
use serde::de::DeserializeOwned;

use crate::auth::{extract_token_from_header, Claims, JwtValidator};
use crate::types::{Result, VaultError};

/// Verify the bearer token on a request
pub fn authenticate(headers: &HeaderMap, jwt: &JwtValidator) -> Result<Claims> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = extract_token_from_header(auth_header)
        .ok_or_else(|| VaultError::Unauthorized("Authentication required".into()))?;
    jwt.verify_token(token)
}

/// Read at most `limit` bytes and decode them as JSON
pub async fn read_json<T, B>(body: B, limit: usize) -> Result<T>
where
    T: DeserializeOwned,
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let collected = Limited::new(body, limit).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            VaultError::Http("Request body too large".into())
        } else {
            VaultError::Http(format!("Failed to read body: {}", e))
        }
    })?;

    Ok(serde_json::from_slice(&collected.to_bytes())?)
}
