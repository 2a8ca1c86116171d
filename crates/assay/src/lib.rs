//! # Assay
//!
//! Expressive assertions for HTTP responses in Rust tests: status codes,
//! headers, cookies and JSON bodies.
//!
//! ## Quick Start
//!
//! ```rust
//! use assay::prelude::*;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let response = TestResponse::json(
//!     StatusCode::OK,
//!     &json!({
//!         "orderId": 7,
//!         "user": {"fullname": "Ann Lee"},
//!         "products": [{"name": "pen", "price": 1}]
//!     }),
//! )
//! .with_header("Cache-Control", "no-store")
//! .unwrap();
//!
//! expect(&response)
//!     .to_be_successful()
//!     .to_have_header_value("cache-control", "no-store")
//!     .to_have_json_path_value("user.fullname", "Ann Lee")
//!     .to_have_json_structure("- orderId\n- products*:\n  - name\n  - price");
//! ```
//!
//! ## Crates
//!
//! - [`core`] - `TestResponse`, `HttpResponse`, `MatchResult`
//! - [`json`] - JSON body matchers, body cache, paths and structure schemas
//! - [`http`] - status, header and cookie matchers
//! - [`config`] - typed configuration (`assay.toml`, `ASSAY__*` overrides)
//! - [`telemetry`] - logging setup
//!
//! ## Lifecycle
//!
//! Decoded bodies are cached per response, so several JSON assertions on one
//! response decode it once. Entries never leak between responses. Hold an
//! [`Assay::scope`] guard in each test case to release its bodies in long
//! suites; [`reset`] clears everything, including bodies that tests running
//! in parallel are still using.

#![doc(html_root_url = "https://docs.rs/assay/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod expect;

pub use context::{Assay, CONFIG_FILE, ENV_PREFIX};
pub use expect::Expectation;

// Re-export member crates
pub use assay_config as config;
pub use assay_core as core;
pub use assay_http as http;
pub use assay_json as json;
pub use assay_telemetry as telemetry;

pub use assay_core::{HttpResponse, MatchResult, ResponseId, TestResponse};

/// Starts an expectation against the process-wide context.
pub fn expect<R>(response: &R) -> Expectation<'_, R>
where
    R: HttpResponse + ?Sized,
{
    Assay::global().expect(response)
}

/// Drops every body cached by the process-wide context.
pub fn reset() {
    Assay::global().reset();
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use assay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{expect, reset, Assay, Expectation};

    pub use assay_core::{HttpResponse, MatchResult, TestResponse};

    pub use assay_http::{SameSite, SetCookie};

    pub use assay_json::{StructureNode, StructureSchema};
}
