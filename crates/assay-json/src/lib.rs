//! Assay JSON - matchers over JSON response bodies
//!
//! This crate checks the JSON content of HTTP responses: its shape, deep
//! equality, values at dotted paths, lengths, and required key structure.
//!
//! # Overview
//!
//! Each response body is decoded at most once per response and reused by
//! every matcher that inspects it:
//!
//! ```text
//!      response (ResponseId, body bytes)
//!                 │
//!      ┌──────────▼──────────┐
//!      │   JsonBodyCache     │  decode once, keyed by ResponseId
//!      └──────────┬──────────┘
//!                 │ Arc<Value>
//!      ┌──────────▼──────────┐
//!      │   JsonMatchers      │  is_json / equals_json / has_path_matching
//!      │                     │  has_length_at / matches_structure
//!      └──────────┬──────────┘
//!                 │
//!            MatchResult
//! ```
//!
//! Paths are dot-separated (`"user.fullname"`, `"products.0.name"`) and are
//! resolved by [`JsonPath`]. Structure checks compile a [`StructureSchema`]
//! from dash-list text, a nested-list literal or nodes built in code.
//!
//! # Example
//!
//! ```
//! use assay_core::TestResponse;
//! use assay_json::JsonMatchers;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let matchers = JsonMatchers::new();
//! let response = TestResponse::json(
//!     StatusCode::OK,
//!     &json!({"products": [{"name": "pen", "price": 1}]}),
//! );
//!
//! assert!(matchers.is_json_object(&response).is_pass());
//! assert!(matchers.has_length_at(&response, 1, Some("products")).is_pass());
//!
//! let structure = matchers
//!     .matches_structure(&response, "- products*:\n  - name\n  - price")
//!     .unwrap();
//! assert!(structure.is_pass());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod compare;
pub mod error;
pub mod matchers;
pub mod path;
pub mod schema;

// Re-exports for convenience
pub use cache::{CacheConfig, CacheScope, CacheStats, JsonBodyCache};
pub use compare::{deep_equals, strict_equals};
pub use error::{DecodeError, FailureKind, JsonFailure, SchemaError};
pub use matchers::JsonMatchers;
pub use path::JsonPath;
pub use schema::{IntoStructureSchema, StructureNode, StructureSchema};
