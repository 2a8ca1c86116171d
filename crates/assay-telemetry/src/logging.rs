//! Logging setup built on `tracing-subscriber`.
//!
//! # Example
//!
//! ```rust,ignore
//! use assay_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::ci())?;
//! tracing::warn!(path = "user.age", "path not found");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "warn", "assay_json=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "warn".to_string(),
            json_format: false,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Human-readable output with matcher internals visible.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
        }
    }

    /// JSON output for CI log collectors.
    #[must_use]
    pub fn ci() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
        }
    }
}

/// Initializes the global logging subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad filter directive and
/// `TelemetryError::LoggingInit` if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Installs a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
/// The filter comes from `RUST_LOG`, defaulting to `assay=debug`.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("assay=debug,assay_json=debug,assay_http=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(format!("{filter}: {e}")))
}

/// Standard log field names used by the matcher crates.
pub mod fields {
    /// Response identity field name.
    pub const RESPONSE_ID: &str = "response_id";

    /// Matcher name field name.
    pub const MATCHER: &str = "matcher";

    /// JSON path field name.
    pub const JSON_PATH: &str = "json_path";

    /// Cache size field name.
    pub const CACHE_SIZE: &str = "cache_size";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(!config.enabled);
        assert!(!config.json_format);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(config.enabled);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_ci_config() {
        let config = LogConfig::ci();
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("assay_json=trace,warn").is_ok());
    }

    #[test]
    fn test_disabled_logging() {
        let result = init_logging(&LogConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!(target: "assay", "test logging installed");
    }
}
