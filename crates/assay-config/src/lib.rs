//! Typed configuration for assay.
//!
//! Supports:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [cache]
//! enabled = true
//! max_entries = 1024
//!
//! [logging]
//! enabled = false
//! level = "warn"
//! format = "pretty"
//!
//! [report]
//! show_diff = true
//! pretty_json = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables named `PREFIX__SECTION__KEY`:
//!
//! - `ASSAY__CACHE__MAX_ENTRIES=64`
//! - `ASSAY__LOGGING__ENABLED=true`
//! - `ASSAY__REPORT__SHOW_DIFF=false`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AssayConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{CacheSection, LogFormat, LoggingSection, ReportSection};
