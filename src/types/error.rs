//! Error types for Legacy Vault
//!
//! Every failure detected before a document byte is written maps to an HTTP
//! status and the `{success: false, message}` envelope. `UpstreamWrite` is the
//! exception: it happens after the status line is committed and can only be
//! logged.

use hyper::StatusCode;
use serde::Serialize;

/// Main error type for Legacy Vault operations
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Entity absent or owned by someone else. The two cases are deliberately
    /// indistinguishable to the caller.
    #[error("{0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Client disconnected mid-transfer: {0}")]
    UpstreamWrite(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    Http(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl VaultError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Never reaches a client; the response is already in flight.
            Self::UpstreamWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message shown to clients. Server-side failures are not echoed verbatim.
    pub fn public_message(&self) -> String {
        match self {
            Self::Render(_) => "Failed to generate document".to_string(),
            Self::Database(_) => "Storage unavailable".to_string(),
            Self::Internal(_) | Self::Config(_) | Self::UpstreamWrite(_) => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// JSON error envelope returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
}

impl From<&VaultError> for ErrorEnvelope {
    fn from(err: &VaultError) -> Self {
        Self {
            success: false,
            message: err.public_message(),
        }
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Http(format!("Invalid JSON: {}", err))
    }
}

impl From<hyper::Error> for VaultError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for VaultError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for VaultError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Unauthorized(format!("JWT error: {}", err))
    }
}

/// Result type alias for Legacy Vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VaultError::NotFound("Will not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VaultError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VaultError::Render("bad font size".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            VaultError::Unauthorized("Authentication required".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_envelope_body() {
        let envelope = ErrorEnvelope::from(&VaultError::NotFound("Will not found".into()));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Will not found");
    }

    #[test]
    fn test_render_details_not_leaked() {
        let envelope = ErrorEnvelope::from(&VaultError::Render("font size NaN in block 3".into()));
        assert!(!envelope.message.contains("NaN"));
        assert_eq!(envelope.message, "Failed to generate document");
    }
}
