//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at the configured level
//! and dependencies at `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::types::VaultError;

/// Default filter directive for a given crate log level
pub fn default_directive(log_level: &str) -> String {
    format!("legacy_vault={},info", log_level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(log_level: &str, format: LogFormat) -> Result<(), VaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    result.map_err(|e| VaultError::Config(format!("Failed to initialise logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert_eq!(directive, "legacy_vault=debug,info");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
