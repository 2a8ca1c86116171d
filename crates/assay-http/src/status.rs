//! Status code matchers.

use assay_core::{HttpResponse, MatchResult};
use http::StatusCode;

/// A status code with a matcher name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedStatus {
    /// Short name, e.g. `"notFound"`.
    pub name: &'static str,
    /// The status code.
    pub code: StatusCode,
}

const fn named(name: &'static str, code: StatusCode) -> NamedStatus {
    NamedStatus { name, code }
}

/// Statuses that get a dedicated matcher.
pub const NAMED_STATUSES: &[NamedStatus] = &[
    named("ok", StatusCode::OK),
    named("created", StatusCode::CREATED),
    named("accepted", StatusCode::ACCEPTED),
    named("noContent", StatusCode::NO_CONTENT),
    named("movedPermanently", StatusCode::MOVED_PERMANENTLY),
    named("found", StatusCode::FOUND),
    named("badRequest", StatusCode::BAD_REQUEST),
    named("unauthorized", StatusCode::UNAUTHORIZED),
    named("paymentRequired", StatusCode::PAYMENT_REQUIRED),
    named("forbidden", StatusCode::FORBIDDEN),
    named("notFound", StatusCode::NOT_FOUND),
    named("methodNotAllowed", StatusCode::METHOD_NOT_ALLOWED),
    named("conflict", StatusCode::CONFLICT),
    named("gone", StatusCode::GONE),
    named("unsupportedMediaType", StatusCode::UNSUPPORTED_MEDIA_TYPE),
    named("unprocessable", StatusCode::UNPROCESSABLE_ENTITY),
    named("tooManyRequests", StatusCode::TOO_MANY_REQUESTS),
    named("internalServerError", StatusCode::INTERNAL_SERVER_ERROR),
    named("serviceUnavailable", StatusCode::SERVICE_UNAVAILABLE),
];

/// Looks up a named status.
pub fn lookup(name: &str) -> Option<&'static NamedStatus> {
    NAMED_STATUSES.iter().find(|status| status.name == name)
}

/// Matcher name for a named status: `notFound` becomes `to_have_status_not_found`.
///
/// ```
/// use assay_http::status::matcher_name;
///
/// assert_eq!(matcher_name("ok"), "to_have_status_ok");
/// assert_eq!(matcher_name("internalServerError"), "to_have_status_internal_server_error");
/// ```
pub fn matcher_name(name: &str) -> String {
    let mut out = String::from("to_have_status_");
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Passes if the status equals `expected`.
pub fn has_status<R>(response: &R, expected: u16) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let actual = response.status().as_u16();
    if actual == expected {
        MatchResult::pass(move || format!("Expected status code not to be {expected}."))
    } else {
        MatchResult::fail(move || {
            format!("Expected status code to be {expected}, but received {actual}.")
        })
    }
}

/// Passes if the status is a named status.
///
/// Returns `None` for names not in [`NAMED_STATUSES`].
pub fn has_named_status<R>(response: &R, name: &str) -> Option<MatchResult>
where
    R: HttpResponse + ?Sized,
{
    lookup(name).map(|status| has_status(response, status.code.as_u16()))
}

/// Passes for 2xx statuses.
pub fn is_successful<R>(response: &R) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let actual = response.status().as_u16();
    if (200..300).contains(&actual) {
        MatchResult::pass(move || {
            format!("Expected a non-successful status code, but received {actual}.")
        })
    } else {
        MatchResult::fail(move || {
            format!("Expected a successful status code (2xx), but received {actual}.")
        })
    }
}

/// Passes for 5xx statuses.
pub fn is_server_error<R>(response: &R) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let actual = response.status().as_u16();
    if (500..600).contains(&actual) {
        MatchResult::pass(move || {
            format!("Expected a non-server-error status code, but received {actual}.")
        })
    } else {
        MatchResult::fail(move || {
            format!("Expected a server error status code (5xx), but received {actual}.")
        })
    }
}
