//! # Assay Core
//!
//! Shared building blocks for the assay matcher crates:
//!
//! - [`TestResponse`] - an in-memory HTTP response with a stable identity
//! - [`HttpResponse`] - the trait every matcher consumes
//! - [`ResponseId`] - per-response identity used to scope cached state
//! - [`MatchResult`] - the pass/fail verdict returned by every matcher
//!
//! ## Example
//!
//! ```
//! use assay_core::{HttpResponse, MatchResult, TestResponse};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let response = TestResponse::json(StatusCode::OK, &json!({"id": 1}));
//! assert_eq!(response.status(), StatusCode::OK);
//!
//! let result = MatchResult::new(response.status().is_success(), || "not a 2xx".to_string());
//! assert!(result.is_pass());
//! ```

#![doc(html_root_url = "https://docs.rs/assay-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod response;
mod result;

pub use error::{AssayError, AssayResult};
pub use response::{HttpResponse, ResponseId, TestResponse};
pub use result::MatchResult;
