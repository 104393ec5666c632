//! Configuration for Legacy Vault
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use crate::render::{PageSize, RenderConfig};

/// Tokens issued by the platform are valid for seven days.
pub const DEFAULT_JWT_EXPIRY_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Legacy Vault - wills and memorials with PDF document generation
#[derive(Parser, Debug, Clone)]
#[command(name = "legacy-vault")]
#[command(about = "Owner-scoped wills and memorials service with PDF generation")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Enable development mode (in-memory storage fallback, default JWT secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// MongoDB connection URI (in-memory storage when absent)
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "legacy_vault")]
    pub mongodb_db: String,

    /// JWT secret for token verification (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value_t = DEFAULT_JWT_EXPIRY_SECONDS)]
    pub jwt_expiry_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Physical page size for generated documents
    #[arg(long, env = "PAGE_SIZE", value_enum, default_value_t = PageSizeArg::Letter)]
    pub page_size: PageSizeArg,

    /// Page-edge inset for generated documents, in points
    #[arg(long, env = "PAGE_MARGIN", default_value = "50")]
    pub page_margin: f32,

    /// Maximum accepted JSON request body, in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "65536")]
    pub max_body_bytes: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PageSizeArg {
    Letter,
    A4,
}

impl Args {
    /// Renderer configuration derived from the page flags
    pub fn render_config(&self) -> RenderConfig {
        let page_size = match self.page_size {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        };
        RenderConfig {
            margin: self.page_margin,
            page_size,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.jwt_secret {
                None => return Err("JWT_SECRET is required in production mode".to_string()),
                Some(secret) if secret.len() < 32 => {
                    return Err("JWT_SECRET must be at least 32 characters".to_string())
                }
                Some(_) => {}
            }
        }

        self.render_config()
            .validate()
            .map_err(|e| format!("Invalid page configuration: {}", e))?;

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than zero".to_string());
        }

        Ok(())
    }
}
