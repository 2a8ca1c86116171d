//! Dotted path lookup into JSON values.
//!
//! A path is a dot-delimited list of segments. A segment made only of ASCII
//! digits indexes a sequence; any segment may name a mapping key. There is no
//! escaping, so keys that contain `.` are not addressable. The empty path
//! addresses the root value.
//!
//! ```
//! use assay_json::path::resolve;
//! use serde_json::json;
//!
//! let value = json!({"items": [{"name": "pen"}]});
//! assert_eq!(resolve(&value, "items.0.name"), Some(&json!("pen")));
//! assert_eq!(resolve(&value, "items.1.name"), None);
//! assert_eq!(resolve(&value, ""), Some(&value));
//! ```

use serde_json::Value;
use std::fmt;

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonPath {
    raw: String,
    segments: Vec<String>,
}

impl JsonPath {
    /// Parses a path. Parsing never fails; unresolvable segments simply
    /// produce a not-found lookup.
    pub fn parse(path: &str) -> Self {
        let segments = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').map(str::to_string).collect()
        };

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true for the empty (root) path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the original path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolves the path against `root`.
    ///
    /// Returns `None` as soon as any segment fails; an intermediate value is
    /// never returned.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let mut current = root;

        for segment in &self.segments {
            current = match current {
                Value::Array(items) => items.get(parse_index(segment)?)?,
                Value::Object(map) => map.get(segment.as_str())?,
                _ => {
                    tracing::trace!(json_path = %self.raw, segment = %segment, "segment on scalar");
                    return None;
                }
            };
        }

        Some(current)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for JsonPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Resolves `path` against `value`.
///
/// `Some` means the path was found.
pub fn resolve<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    JsonPath::parse(path).resolve(value)
}

// Digits only; rejects signs and whitespace that `usize::from_str` would
// otherwise accept or that would alias a key.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
