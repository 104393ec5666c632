//! Response helpers shared by every route

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::types::{ErrorEnvelope, VaultError};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// `{success: true, data?, message?}`
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    full_body(Bytes::new())
}

pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let (status, json) = match serde_json::to_string(body) {
        Ok(json) => (status, json),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"success":false,"message":"Internal Server Error"}"#.to_string(),
            )
        }
    };

    let mut response = Response::new(full_body(json));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    apply_cors(headers);
    response
}

pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response<BoxBody> {
    json_response(
        status,
        &SuccessEnvelope {
            success: true,
            data: Some(data),
            message: None,
        },
    )
}

pub fn success_message(message: impl Into<String>) -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &SuccessEnvelope::<()> {
            success: true,
            data: None,
            message: Some(message.into()),
        },
    )
}

/// Map an error to its status and the failure envelope
pub fn error_response(err: &VaultError) -> Response<BoxBody> {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), "Request failed: {}", err);
    } else if status == StatusCode::UNAUTHORIZED {
        warn!("Rejected request: {}", err);
    } else {
        debug!(status = status.as_u16(), "Request failed: {}", err);
    }
    json_response(status, &ErrorEnvelope::from(err))
}

pub fn cors_preflight() -> Response<BoxBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    apply_cors(headers);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}
