//! Fluent assertions.
//!
//! Every assertion evaluates one matcher and panics with the matcher's
//! message when the verdict disagrees with the expectation. Assertions return
//! `&Self`, so several can be chained on one response.
//!
//! ```
//! use assay::{expect, TestResponse};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let response = TestResponse::json(StatusCode::OK, &json!({"items": [1, 2, 3]}));
//!
//! expect(&response)
//!     .to_have_status_ok()
//!     .to_be_json_object()
//!     .to_have_json_length_at(3, "items");
//!
//! expect(&response).not().to_have_json_path("missing");
//! ```

use crate::context::Assay;
use assay_core::{HttpResponse, MatchResult};
use assay_http::{cookie, header, status};
use assay_json::IntoStructureSchema;
use serde_json::Value;
use std::fmt;

/// An expectation about one response.
pub struct Expectation<'a, R: ?Sized> {
    assay: &'a Assay,
    response: &'a R,
    negated: bool,
}

/// Generates one assertion per named status.
macro_rules! named_status_assertions {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Asserts the `", $name, "` status.")]
            #[track_caller]
            pub fn $method(&self) -> &Self {
                self.to_have_named_status($name)
            }
        )*
    };
}

impl<'a, R> Expectation<'a, R>
where
    R: HttpResponse + ?Sized,
{
    pub(crate) fn new(assay: &'a Assay, response: &'a R) -> Self {
        Self {
            assay,
            response,
            negated: false,
        }
    }

    /// Inverts the following assertions.
    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            negated: !self.negated,
            ..*self
        }
    }

    /// The response under test.
    pub fn response(&self) -> &'a R {
        self.response
    }

    // Status

    /// Asserts an exact status code.
    #[track_caller]
    pub fn to_have_status(&self, expected: u16) -> &Self {
        self.check(&status::has_status(self.response, expected))
    }

    /// Asserts a 2xx status.
    #[track_caller]
    pub fn to_be_successful(&self) -> &Self {
        self.check(&status::is_successful(self.response))
    }

    /// Asserts a 5xx status.
    #[track_caller]
    pub fn to_be_server_error(&self) -> &Self {
        self.check(&status::is_server_error(self.response))
    }

    /// Asserts a status by name, e.g. `"notFound"`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not one of [`NAMED_STATUSES`](assay_http::NAMED_STATUSES).
    #[track_caller]
    pub fn to_have_named_status(&self, name: &str) -> &Self {
        match status::has_named_status(self.response, name) {
            Some(result) => self.check(&result),
            None => panic!("Unknown status name \"{name}\""),
        }
    }

    named_status_assertions! {
        to_have_status_ok => "ok",
        to_have_status_created => "created",
        to_have_status_accepted => "accepted",
        to_have_status_no_content => "noContent",
        to_have_status_moved_permanently => "movedPermanently",
        to_have_status_found => "found",
        to_have_status_bad_request => "badRequest",
        to_have_status_unauthorized => "unauthorized",
        to_have_status_payment_required => "paymentRequired",
        to_have_status_forbidden => "forbidden",
        to_have_status_not_found => "notFound",
        to_have_status_method_not_allowed => "methodNotAllowed",
        to_have_status_conflict => "conflict",
        to_have_status_gone => "gone",
        to_have_status_unsupported_media_type => "unsupportedMediaType",
        to_have_status_unprocessable => "unprocessable",
        to_have_status_too_many_requests => "tooManyRequests",
        to_have_status_internal_server_error => "internalServerError",
        to_have_status_service_unavailable => "serviceUnavailable",
    }

    // Headers

    /// Asserts that a header is present.
    #[track_caller]
    pub fn to_have_header(&self, name: &str) -> &Self {
        self.check(&header::has_header(self.response, name, None))
    }

    /// Asserts a header value.
    #[track_caller]
    pub fn to_have_header_value(&self, name: &str, expected: &str) -> &Self {
        self.check(&header::has_header(self.response, name, Some(expected)))
    }

    // Cookies

    /// Asserts that a cookie is set.
    #[track_caller]
    pub fn to_have_cookie(&self, name: &str) -> &Self {
        self.check(&cookie::has_cookie(self.response, name, None))
    }

    /// Asserts a cookie value.
    #[track_caller]
    pub fn to_have_cookie_value(&self, name: &str, expected: &str) -> &Self {
        self.check(&cookie::has_cookie(self.response, name, Some(expected)))
    }

    /// Asserts that a cookie is set and expired.
    #[track_caller]
    pub fn to_have_cookie_expired(&self, name: &str) -> &Self {
        self.check(&cookie::is_cookie_expired(self.response, name))
    }

    // JSON

    /// Asserts that the body is valid JSON.
    #[track_caller]
    pub fn to_be_json(&self) -> &Self {
        self.check(&self.assay.json().is_json(self.response))
    }

    /// Asserts that the body is a JSON object.
    #[track_caller]
    pub fn to_be_json_object(&self) -> &Self {
        self.check(&self.assay.json().is_json_object(self.response))
    }

    /// Asserts that the body is a JSON array.
    #[track_caller]
    pub fn to_be_json_array(&self) -> &Self {
        self.check(&self.assay.json().is_json_array(self.response))
    }

    /// Asserts that the body deeply equals `expected`.
    #[track_caller]
    pub fn to_have_json(&self, expected: &Value) -> &Self {
        self.check(&self.assay.json().equals_json(self.response, expected))
    }

    /// Asserts that a dotted path exists in the body.
    #[track_caller]
    pub fn to_have_json_path(&self, path: &str) -> &Self {
        self.check(&self.assay.json().has_path_matching(self.response, path, None))
    }

    /// Asserts the scalar value at a dotted path.
    ///
    /// Arrays and objects never compare equal here; use
    /// [`to_have_json`](Self::to_have_json) for whole documents.
    #[track_caller]
    pub fn to_have_json_path_value(&self, path: &str, expected: impl Into<Value>) -> &Self {
        let expected = expected.into();
        self.check(
            &self
                .assay
                .json()
                .has_path_matching(self.response, path, Some(&expected)),
        )
    }

    /// Asserts the length of the root array.
    #[track_caller]
    pub fn to_have_json_length(&self, expected: usize) -> &Self {
        self.check(&self.assay.json().has_length_at(self.response, expected, None))
    }

    /// Asserts the length of the array at a dotted path.
    #[track_caller]
    pub fn to_have_json_length_at(&self, expected: usize, path: &str) -> &Self {
        self.check(
            &self
                .assay
                .json()
                .has_length_at(self.response, expected, Some(path)),
        )
    }

    /// Asserts that the body contains every entry of a structure schema.
    ///
    /// # Panics
    ///
    /// Panics immediately, negated or not, if the schema does not compile.
    #[track_caller]
    pub fn to_have_json_structure<S>(&self, schema: S) -> &Self
    where
        S: IntoStructureSchema,
    {
        match self.assay.json().matches_structure(self.response, schema) {
            Ok(result) => self.check(&result),
            Err(e) => panic!("{e}"),
        }
    }

    #[track_caller]
    fn check(&self, result: &MatchResult) -> &Self {
        if result.is_pass() == self.negated {
            panic!("{}", self.render(result));
        }
        self
    }

    fn render(&self, result: &MatchResult) -> String {
        let mut message = result.message();
        let report = &self.assay.config().report;

        if report.show_diff && !self.negated {
            if let (Some(actual), Some(expected)) = (result.actual(), result.expected()) {
                let pretty = report.pretty_json;
                message.push_str(&format!(
                    "\n\nExpected: {}\nReceived: {}",
                    render_value(expected, pretty),
                    render_value(actual, pretty)
                ));
            }
        }

        message
    }
}

fn render_value(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

impl<R: ?Sized> fmt::Debug for Expectation<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("negated", &self.negated)
            .finish_non_exhaustive()
    }
}
