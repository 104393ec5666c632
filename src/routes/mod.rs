//! HTTP routes for Legacy Vault

pub mod delivery;
pub mod documents;
pub mod health;
pub mod memorials;
pub mod request;
pub mod response;
pub mod wills;

pub use delivery::{pdf_response, FRAME_SIZE};
pub use health::{health_check, readiness_check};
pub use request::{authenticate, read_json};
pub use response::{
    cors_preflight, error_response, full_body, json_response, success, success_message, BoxBody,
    SuccessEnvelope,
};
