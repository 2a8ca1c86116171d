//! Cookie matchers and response helpers.
//!
//! Cookies are read from the `Set-Cookie` headers of a response. Each header
//! is split on `;`: the first part is `name=value`, the rest are attributes
//! written as `Key=value` or as a bare `Key` flag.
//!
//! # Example
//!
//! ```rust
//! use assay_core::TestResponse;
//! use assay_http::cookie::{add_cookies_to_response, has_cookie, SameSite, SetCookie};
//! use http::StatusCode;
//!
//! let mut response = TestResponse::empty(StatusCode::OK);
//! add_cookies_to_response(
//!     &mut response,
//!     [
//!         SetCookie::new("session", "abc123").http_only(true).same_site(SameSite::Strict),
//!         SetCookie::new("theme", "dark").path("/"),
//!     ],
//! )
//! .unwrap();
//!
//! assert!(has_cookie(&response, "session", Some("abc123")).is_pass());
//! assert!(!has_cookie(&response, "lang", None).is_pass());
//! ```

use assay_core::{AssayResult, HttpResponse, MatchResult, TestResponse};
use chrono::{DateTime, NaiveDateTime, Utc};
use http::header;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const NETSCAPE_DATE: &str = "%a, %d-%b-%Y %H:%M:%S GMT";

/// Value of a cookie attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieAttribute {
    /// Attribute written without a value, e.g. `Secure`.
    Flag,
    /// Attribute written as `Key=value`.
    Value(String),
}

impl CookieAttribute {
    /// Returns the attribute value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// A cookie set by a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    name: String,
    value: String,
    attributes: BTreeMap<String, CookieAttribute>,
}

impl ResponseCookie {
    /// Parses one `Set-Cookie` header value. Returns `None` when the first
    /// part has no `=`.
    pub fn parse(header_value: &str) -> Option<Self> {
        let mut parts = header_value.split(';');
        let (name, value) = parts.next()?.split_once('=')?;

        let attributes = parts
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (
                    key.trim().to_string(),
                    CookieAttribute::Value(value.trim().to_string()),
                ),
                None => (part.to_string(), CookieAttribute::Flag),
            })
            .collect();

        Some(Self {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
            attributes,
        })
    }

    /// Get the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// All attributes, keyed as written.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, CookieAttribute> {
        &self.attributes
    }

    /// Looks up an attribute, ignoring ASCII case.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&CookieAttribute> {
        self.attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    /// The `Max-Age` attribute in seconds, if present and numeric.
    #[must_use]
    pub fn max_age(&self) -> Option<i64> {
        self.attribute("Max-Age")?.as_str()?.parse().ok()
    }

    /// The `Expires` attribute, if present and a valid HTTP date.
    #[must_use]
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        let raw = self.attribute("Expires")?.as_str()?;
        parse_http_date(raw)
    }

    /// Returns true if the `Secure` attribute is set.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.attribute("Secure").is_some()
    }

    /// Returns true if the `HttpOnly` attribute is set.
    #[must_use]
    pub fn is_http_only(&self) -> bool {
        self.attribute("HttpOnly").is_some()
    }

    /// The `SameSite` attribute, if present and recognized.
    #[must_use]
    pub fn same_site(&self) -> Option<SameSite> {
        match self.attribute("SameSite")?.as_str()? {
            v if v.eq_ignore_ascii_case("strict") => Some(SameSite::Strict),
            v if v.eq_ignore_ascii_case("lax") => Some(SameSite::Lax),
            v if v.eq_ignore_ascii_case("none") => Some(SameSite::None),
            _ => None,
        }
    }

    /// Returns true if the cookie is expired at `now`.
    ///
    /// `Max-Age` wins over `Expires`. A cookie with neither is a session
    /// cookie and is not expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(max_age) = self.max_age() {
            return max_age <= 0;
        }
        self.expires().is_some_and(|expires| expires <= now)
    }
}

fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NETSCAPE_DATE)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Collects the cookies set by a response, keyed by name.
///
/// Later headers win when a name repeats. Headers without `name=value` are
/// skipped.
pub fn cookies_from_response<R>(response: &R) -> BTreeMap<String, ResponseCookie>
where
    R: HttpResponse + ?Sized,
{
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| {
            let raw = String::from_utf8_lossy(value.as_bytes());
            let cookie = ResponseCookie::parse(&raw);
            if cookie.is_none() {
                tracing::debug!(header = %raw, "skipping malformed Set-Cookie header");
            }
            cookie
        })
        .map(|cookie| (cookie.name.clone(), cookie))
        .collect()
}

/// Passes if the cookie is set and, when `expected` is given, if its value
/// equals `expected`.
pub fn has_cookie<R>(response: &R, name: &str, expected: Option<&str>) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let name = name.to_string();
    let Some(cookie) = cookies_from_response(response).remove(&name) else {
        return MatchResult::fail(move || format!("Cookie \"{name}\" not found"));
    };

    match expected {
        None => MatchResult::pass(move || format!("Expected cookie \"{name}\" not to be set")),
        Some(expected) if cookie.value == expected => {
            let expected = expected.to_string();
            MatchResult::pass(move || {
                format!("Expected cookie \"{name}\" not to have value {expected}")
            })
        }
        Some(expected) => {
            let expected = expected.to_string();
            let actual = cookie.value;
            MatchResult::fail(move || {
                format!("Expected cookie \"{name}\" to have value {expected}, but received {actual}")
            })
        }
    }
}

/// Passes if the cookie is set and expired now.
pub fn is_cookie_expired<R>(response: &R, name: &str) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    is_cookie_expired_at(response, name, Utc::now())
}

/// Passes if the cookie is set and expired at `now`.
pub fn is_cookie_expired_at<R>(response: &R, name: &str, now: DateTime<Utc>) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let name = name.to_string();
    let Some(cookie) = cookies_from_response(response).remove(&name) else {
        return MatchResult::fail(move || format!("Cookie \"{name}\" not found"));
    };

    if cookie.is_expired_at(now) {
        MatchResult::pass(move || format!("Cookie \"{name}\" is expired"))
    } else {
        MatchResult::fail(move || format!("Cookie \"{name}\" is not expired"))
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Cookie is sent with cross-site requests.
    None,
    /// Cookie is sent with same-site and cross-site top-level navigations.
    #[default]
    Lax,
    /// Cookie is only sent with same-site requests.
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Lax => write!(f, "Lax"),
            Self::Strict => write!(f, "Strict"),
        }
    }
}

/// Builder for a `Set-Cookie` header, used to prepare fixture responses.
///
/// # Example
///
/// ```rust
/// use assay_http::cookie::{SameSite, SetCookie};
///
/// let cookie = SetCookie::new("session", "abc123")
///     .http_only(true)
///     .secure(true)
///     .same_site(SameSite::Strict)
///     .max_age_secs(3600)
///     .path("/");
///
/// assert_eq!(
///     cookie.to_header_value(),
///     "session=abc123; Path=/; Max-Age=3600; Secure; HttpOnly; SameSite=Strict"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    domain: Option<String>,
    path: Option<String>,
    max_age: Option<Duration>,
    expires: Option<DateTime<Utc>>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    partitioned: bool,
}

impl SetCookie {
    /// Create a new Set-Cookie builder.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            max_age: None,
            expires: None,
            secure: false,
            http_only: false,
            same_site: None,
            partitioned: false,
        }
    }

    /// A cookie that removes itself (`Max-Age=0`).
    #[must_use]
    pub fn remove(name: impl Into<String>) -> Self {
        Self::new(name, "").max_age_secs(0)
    }

    /// Set the Domain attribute.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the Path attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the Max-Age attribute.
    #[must_use]
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.max_age = Some(duration);
        self
    }

    /// Set the Max-Age attribute in seconds.
    #[must_use]
    pub fn max_age_secs(self, seconds: u64) -> Self {
        self.max_age(Duration::from_secs(seconds))
    }

    /// Set the Expires attribute.
    #[must_use]
    pub fn expires(mut self, at: DateTime<Utc>) -> Self {
        self.expires = Some(at);
        self
    }

    /// Set the Secure attribute.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` attribute.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the `SameSite` attribute.
    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Set the `Partitioned` attribute.
    #[must_use]
    pub fn partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = partitioned;
        self
    }

    /// Get the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Convert to a `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut parts = vec![format!("{}={}", self.name, self.value)];

        if let Some(ref domain) = self.domain {
            parts.push(format!("Domain={domain}"));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("Path={path}"));
        }
        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age.as_secs()));
        }
        if let Some(expires) = self.expires {
            parts.push(format!("Expires={}", expires.format(HTTP_DATE)));
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if let Some(same_site) = self.same_site {
            parts.push(format!("SameSite={same_site}"));
        }
        if self.partitioned {
            parts.push("Partitioned".to_string());
        }

        parts.join("; ")
    }
}

/// Appends one `Set-Cookie` header per cookie.
///
/// # Errors
///
/// Returns an error if a cookie does not form a valid header value.
pub fn add_cookies_to_response<I>(response: &mut TestResponse, cookies: I) -> AssayResult<()>
where
    I: IntoIterator<Item = SetCookie>,
{
    for cookie in cookies {
        response.append_header(header::SET_COOKIE.as_str(), &cookie.to_header_value())?;
    }
    Ok(())
}
