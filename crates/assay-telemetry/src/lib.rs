//! Structured logging for assay.
//!
//! The matcher crates emit `tracing` events (cache hits and misses, decode
//! failures, path resolution). This crate wires those events to an output:
//!
//! - Pretty, human-readable output for local runs
//! - JSON output for CI log collectors
//! - Test-writer output that is captured per test by the Rust test harness
//!
//! # Example
//!
//! ```rust,ignore
//! use assay_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::debug!(response_id = 7, "decoded JSON body");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
