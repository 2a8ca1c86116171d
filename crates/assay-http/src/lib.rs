//! Assay HTTP - status, header and cookie matchers
//!
//! Matchers over the non-body parts of a response. Every matcher takes any
//! [`HttpResponse`](assay_core::HttpResponse) and returns a
//! [`MatchResult`](assay_core::MatchResult).
//!
//! - [`status`] - exact, named and class (2xx, 5xx) status checks
//! - [`header`] - header presence and value
//! - [`cookie`] - `Set-Cookie` parsing, presence, value and expiry, plus a
//!   builder for fixture cookies
//!
//! # Example
//!
//! ```
//! use assay_core::TestResponse;
//! use assay_http::{header, status};
//! use http::StatusCode;
//!
//! let response = TestResponse::text(StatusCode::CREATED, "done");
//!
//! assert!(status::is_successful(&response).is_pass());
//! assert!(status::has_named_status(&response, "created").unwrap().is_pass());
//! assert!(header::has_header(&response, "content-type", Some("text/plain")).is_pass());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cookie;
pub mod header;
pub mod status;

pub use cookie::{
    add_cookies_to_response, cookies_from_response, has_cookie, is_cookie_expired,
    is_cookie_expired_at, CookieAttribute, ResponseCookie, SameSite, SetCookie,
};
pub use header::has_header;
pub use status::{
    has_named_status, has_status, is_server_error, is_successful, matcher_name, NamedStatus,
    NAMED_STATUSES,
};
