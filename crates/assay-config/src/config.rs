//! Main configuration type.

use serde::{Deserialize, Serialize};

use crate::{CacheSection, ConfigError, LogFormat, LoggingSection, ReportSection};

/// Complete assay configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use assay_config::AssayConfig;
///
/// let config = AssayConfig::default();
/// assert!(config.cache.enabled);
/// assert!(config.report.show_diff);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AssayConfig {
    /// Body cache configuration.
    #[serde(default)]
    pub cache: CacheSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Failure report configuration.
    #[serde(default)]
    pub report: ReportSection,
}

impl AssayConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - the cache is enabled with `max_entries = 0`
    /// - the log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::invalid_value(
                "cache.max_entries",
                "must be greater than 0 when the cache is enabled",
            ));
        }

        assay_telemetry::logging::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Preset for local debugging: debug logs, pretty output.
    ///
    /// ```
    /// use assay_config::AssayConfig;
    ///
    /// let config = AssayConfig::development();
    /// assert!(config.logging.enabled);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.enabled = true;
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Preset for CI runs: JSON logs, compact payloads in failure messages.
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();
        config.logging.enabled = true;
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.report.pretty_json = false;
        config
    }
}
