//! Account tokens
//!
//! HS256 tokens naming the account that owns a request. `Claims::user_id` is
//! the owner key for every will and memorial lookup.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_JWT_EXPIRY_SECONDS;
use crate::types::VaultError;

const MIN_SECRET_LEN: usize = 32;
const DEV_SECRET: &str = "legacy-vault-local-development-signing-key";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    /// Issued at, Unix seconds
    pub iat: u64,
    /// Expiry, Unix seconds
    pub exp: u64,
}

/// Account a token is issued for
#[derive(Debug, Clone)]
pub struct TokenInput {
    pub user_id: String,
    pub email: String,
}

/// Signs and checks account tokens with one shared secret
#[derive(Clone)]
pub struct JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
}

impl JwtValidator {
    pub fn new(secret: String, ttl_seconds: u64) -> Result<Self, VaultError> {
        if secret.is_empty() {
            return Err(VaultError::Config(
                "JWT_SECRET is required outside dev mode".into(),
            ));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(VaultError::Config(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self::with_secret(secret.as_bytes(), ttl_seconds))
    }

    /// Fixed well-known secret; only for local runs.
    pub fn new_dev() -> Self {
        Self::with_secret(DEV_SECRET.as_bytes(), DEFAULT_JWT_EXPIRY_SECONDS)
    }

    fn with_secret(secret: &[u8], ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds,
        }
    }

    /// Issue a token for `input`, valid for the configured lifetime
    pub fn generate_token(&self, input: TokenInput) -> Result<String, VaultError> {
        let iat = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let claims = Claims {
            user_id: input.user_id,
            email: input.email,
            iat,
            exp: iat + self.ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| VaultError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry and return the claims.
    /// Every failure is `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, VaultError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidSignature => "Invalid token signature",
                    _ => "Invalid token",
                };
                VaultError::Unauthorized(reason.into())
            })
    }
}

/// Token from an `Authorization` header value. Takes `Bearer <token>` (any
/// scheme case) or a bare token; other schemes yield `None`.
pub fn extract_token_from_header(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case("bearer") => return None,
        None => value,
    };
    (!token.is_empty()).then_some(token)
}
