//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use assay_json::CacheConfig;
use assay_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Body cache section.
///
/// # Example
///
/// ```
/// use assay_config::CacheSection;
///
/// let section: CacheSection = toml::from_str("max_entries = 64").unwrap();
/// assert!(section.enabled);
/// assert_eq!(section.max_entries, 64);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    /// Memoize decoded bodies per response.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached bodies before the oldest is evicted.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

impl From<&CacheSection> for CacheConfig {
    fn from(section: &CacheSection) -> Self {
        Self {
            enabled: section.enabled,
            max_entries: section.max_entries,
        }
    }
}

fn default_max_entries() -> usize {
    1024
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Install a subscriber when the matcher context starts.
    #[serde(default)]
    pub enabled: bool,

    /// Filter directive, e.g. `"warn"` or `"assay_json=debug"`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            enabled: section.enabled,
            level: section.level.clone(),
            json_format: section.format == LogFormat::Json,
            ..Self::default()
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

/// Failure report section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// Append actual and expected payloads to failure messages.
    #[serde(default = "default_true")]
    pub show_diff: bool,

    /// Pretty-print payloads in failure messages.
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            show_diff: true,
            pretty_json: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_section_defaults() {
        let section = CacheSection::default();
        assert!(section.enabled);
        assert_eq!(section.max_entries, 1024);

        let config = CacheConfig::from(&section);
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_logging_section_to_log_config() {
        let section = LoggingSection {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Json,
        };

        let config = LogConfig::from(&section);
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        let format: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(format, LogFormat::Pretty);
        assert!(serde_json::from_str::<LogFormat>("\"xml\"").is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<ReportSection>("colour = true").is_err());
    }
}
