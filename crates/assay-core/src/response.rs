//! Test response wrapper.

use crate::error::{AssayError, AssayResult};
use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RESPONSE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a response instance.
///
/// Every [`TestResponse`] receives a fresh id at construction. Cached state
/// about a response (such as its decoded JSON body) is keyed by this id, so
/// two different responses never observe each other's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponseId(u64);

impl ResponseId {
    /// Allocates a new, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_RESPONSE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "response#{}", self.0)
    }
}

/// A fully received HTTP response that matchers can inspect.
///
/// Implement this for your own response types to use them with the assay
/// matchers. The body must already be in memory.
pub trait HttpResponse {
    /// Identity used to scope cached state.
    fn id(&self) -> ResponseId;

    /// Response status code.
    fn status(&self) -> StatusCode;

    /// Response headers.
    fn headers(&self) -> &HeaderMap;

    /// Raw body bytes.
    fn body(&self) -> &[u8];
}

/// A test response with a stable identity and an in-memory body.
///
/// Clones share the identity of the original; their bodies are identical
/// and immutable.
#[derive(Clone)]
pub struct TestResponse {
    id: ResponseId,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Creates a new test response from an HTTP response, collecting its body.
    pub async fn from_http<B>(response: http::Response<B>) -> AssayResult<Self>
    where
        B: http_body_util::BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body_bytes = body
            .collect()
            .await
            .map_err(|e| AssayError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self::new(parts.status, parts.headers, body_bytes))
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            id: ResponseId::next(),
            status,
            headers,
            body: body.into(),
        }
    }

    /// Creates a response whose body is the serialization of `body`, with a
    /// `Content-Type: application/json` header.
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Self::new(status, headers, body.to_string())
    }

    /// Creates a plain-text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        Self::new(status, headers, body.into())
    }

    /// Creates a response with the given status and no headers or body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Bytes::new())
    }

    /// Sets a header, replacing any existing values.
    pub fn with_header(mut self, name: &str, value: &str) -> AssayResult<Self> {
        let (name, value) = encode_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Appends a header value, keeping existing values.
    pub fn append_header(&mut self, name: &str, value: &str) -> AssayResult<()> {
        let (name, value) = encode_header(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the body as a string.
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text_body(&self) -> AssayResult<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Deserializes the body as JSON.
    pub fn json_body<T: DeserializeOwned>(&self) -> AssayResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl HttpResponse for TestResponse {
    fn id(&self) -> ResponseId {
        self.id
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

impl<T: HttpResponse + ?Sized> HttpResponse for &T {
    fn id(&self) -> ResponseId {
        (**self).id()
    }

    fn status(&self) -> StatusCode {
        (**self).status()
    }

    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> &[u8] {
        (**self).body()
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

fn encode_header(name: &str, value: &str) -> AssayResult<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| AssayError::invalid_header(format!("{name}: {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| AssayError::invalid_header(format!("{name}: {e}")))?;
    Ok((name, value))
}
