//! Structure schemas.
//!
//! A structure schema lists the mapping keys a JSON body must contain,
//! without checking their values. Entries are a required subset: extra keys
//! in the body are fine.
//!
//! Schemas come in three forms that compile to the same [`StructureSchema`]:
//!
//! - dash-list text:
//!
//!   ```text
//!   - orderId
//!   - user:
//!     - name
//!     - email
//!   - products*:
//!     - name
//!     - price
//!   ```
//!
//! - a nested-list literal:
//!   `["orderId", ["user", ["name", "email"]], ["products*", ["name", "price"]]]`
//!
//! - nodes built in code with [`StructureNode::key`], [`StructureNode::nested`]
//!   and [`StructureNode::each`].
//!
//! A `*` suffix marks a sequence: the union of the fields of all its elements
//! must satisfy the nested entries. A key that really ends in `*` is written
//! with the marker escaped, `rate\*`.

mod derive;
mod parser;

use crate::error::SchemaError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Suffix marking a sequence entry in textual and literal schemas.
pub const WILDCARD_MARKER: char = '*';

/// Suffix for a key that ends in a literal `*`.
const ESCAPED_MARKER: &str = "\\*";

/// One required entry of a structure schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructureNode {
    /// The key must exist, with any value.
    Key(String),

    /// The key must exist and its value must satisfy `children`.
    Nested {
        /// Mapping key.
        key: String,
        /// Entries required in the nested mapping.
        children: Vec<StructureNode>,
    },

    /// The key must hold a sequence whose elements' fields, unioned, satisfy
    /// `children`.
    Each {
        /// Mapping key, without the wildcard marker.
        key: String,
        /// Entries required in the union of the elements.
        children: Vec<StructureNode>,
    },
}

impl StructureNode {
    /// A bare key.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// A key with a nested structure.
    pub fn nested(key: impl Into<String>, children: impl Into<Vec<StructureNode>>) -> Self {
        Self::Nested {
            key: key.into(),
            children: children.into(),
        }
    }

    /// A sequence key whose elements must satisfy `children`.
    pub fn each(key: impl Into<String>, children: impl Into<Vec<StructureNode>>) -> Self {
        Self::Each {
            key: key.into(),
            children: children.into(),
        }
    }

    /// Builds a node from a schema key, honoring the wildcard marker.
    pub(crate) fn from_schema_key(name: &str, children: Option<Vec<StructureNode>>) -> Self {
        if let Some(stem) = name.strip_suffix(ESCAPED_MARKER) {
            let key = format!("{stem}{WILDCARD_MARKER}");
            return match children {
                Some(children) => Self::nested(key, children),
                None => Self::key(key),
            };
        }

        match (name.strip_suffix(WILDCARD_MARKER), children) {
            (Some(key), children) => Self::each(key, children.unwrap_or_default()),
            (None, Some(children)) => Self::nested(name, children),
            (None, None) => Self::key(name),
        }
    }

    /// The mapping key this node requires.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Key(key) | Self::Nested { key, .. } | Self::Each { key, .. } => key,
        }
    }

    /// The key as written in a schema, including the wildcard marker.
    ///
    /// A trailing `*` in a plain key is escaped so it does not read back as
    /// a wildcard.
    #[must_use]
    pub fn schema_key(&self) -> String {
        match self {
            Self::Each { key, .. } => format!("{key}{WILDCARD_MARKER}"),
            other => match other.name().strip_suffix(WILDCARD_MARKER) {
                Some(stem) => format!("{stem}{ESCAPED_MARKER}"),
                None => other.name().to_string(),
            },
        }
    }

    /// Nested entries, empty for bare keys.
    #[must_use]
    pub fn children(&self) -> &[StructureNode] {
        match self {
            Self::Key(_) => &[],
            Self::Nested { children, .. } | Self::Each { children, .. } => children,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Key(key) => Value::String(key.clone()),
            Self::Each { children, .. } if children.is_empty() => Value::String(self.schema_key()),
            Self::Nested { children, .. } | Self::Each { children, .. } => Value::Array(vec![
                Value::String(self.schema_key()),
                Value::Array(children.iter().map(Self::to_value).collect()),
            ]),
        }
    }

    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(name) => Ok(Self::from_schema_key(checked_key(name)?, None)),
            Value::Array(pair) => match pair.as_slice() {
                [Value::String(name), Value::Array(children)] => {
                    let children = children
                        .iter()
                        .map(Self::from_value)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Self::from_schema_key(checked_key(name)?, Some(children)))
                }
                [Value::String(name), Value::String(child)] => {
                    let child = Self::from_schema_key(checked_key(child)?, None);
                    Ok(Self::from_schema_key(checked_key(name)?, Some(vec![child])))
                }
                _ => Err(SchemaError::invalid_literal(format!(
                    "expected [key, [children]], got {value}"
                ))),
            },
            other => Err(SchemaError::invalid_literal(format!(
                "expected a key or [key, [children]], got {other}"
            ))),
        }
    }

    fn collect_missing(&self, map: Option<&Map<String, Value>>, prefix: &str, missing: &mut Vec<String>) {
        let label = if prefix.is_empty() {
            self.schema_key()
        } else {
            format!("{prefix}.{}", self.schema_key())
        };

        let Some(value) = map.and_then(|m| m.get(self.name())) else {
            missing.push(label);
            return;
        };

        match self {
            Self::Key(_) => {}
            Self::Nested { children, .. } => {
                for child in children {
                    child.collect_missing(value.as_object(), &label, missing);
                }
            }
            Self::Each { children, .. } => {
                let Value::Array(items) = value else {
                    missing.push(label);
                    return;
                };
                let merged = union_fields(items);
                for child in children {
                    child.collect_missing(Some(&merged), &label, missing);
                }
            }
        }
    }
}

/// A compiled structure schema: the list of required top-level entries.
///
/// # Example
///
/// ```
/// use assay_json::StructureSchema;
/// use serde_json::json;
///
/// let schema: StructureSchema = "- user:\n  - name\n- products*:\n  - price".parse().unwrap();
/// let body = json!({
///     "user": {"name": "Ann", "email": "ann@example.com"},
///     "products": [{"price": 1}, {"price": 2, "name": "pen"}]
/// });
///
/// assert!(schema.missing_in(&body).is_empty());
/// assert_eq!(schema.to_value(), json!([["user", ["name"]], ["products*", ["price"]]]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructureSchema {
    nodes: Vec<StructureNode>,
}

impl StructureSchema {
    /// Wraps already-built nodes.
    pub fn new(nodes: Vec<StructureNode>) -> Self {
        Self { nodes }
    }

    /// Compiles dash-list text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for text outside the dash-list subset.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        parser::parse(text).map(Self::new)
    }

    /// Compiles a nested-list literal.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidLiteral`] if `value` is not an array of
    /// keys and `[key, children]` pairs.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let Value::Array(items) = value else {
            return Err(SchemaError::invalid_literal(format!(
                "expected an array of entries, got {value}"
            )));
        };
        items
            .iter()
            .map(StructureNode::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Derives a schema describing `sample`.
    ///
    /// Sequences become wildcard entries whose children describe the union of
    /// their elements; mappings become nested entries; everything else is a
    /// bare key.
    pub fn derive(sample: &Map<String, Value>) -> Self {
        Self::new(derive::derive_nodes(sample))
    }

    /// Derives a schema from a sample value, which must be a mapping.
    pub fn derive_from_value(sample: &Value) -> Option<Self> {
        sample.as_object().map(Self::derive)
    }

    /// Top-level entries.
    #[must_use]
    pub fn nodes(&self) -> &[StructureNode] {
        &self.nodes
    }

    /// Returns true if the schema requires nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the nested-list literal form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.nodes.iter().map(StructureNode::to_value).collect())
    }

    /// Lists every required position absent from `value`, in schema order.
    ///
    /// Positions are dotted, with wildcard entries keeping their `*`
    /// (`products*.price`).
    #[must_use]
    pub fn missing_in(&self, value: &Value) -> Vec<String> {
        let mut missing = Vec::new();
        for node in &self.nodes {
            node.collect_missing(value.as_object(), "", &mut missing);
        }
        missing
    }

    /// Returns true if `value` satisfies the schema.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &Value) -> bool {
        self.missing_in(value).is_empty()
    }
}

impl FromStr for StructureSchema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<StructureNode>> for StructureSchema {
    fn from(nodes: Vec<StructureNode>) -> Self {
        Self::new(nodes)
    }
}

/// Renders dash-list text that compiles back to an equivalent schema.
///
/// A nested entry with no children is written as a bare key.
impl fmt::Display for StructureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[StructureNode], depth: usize) -> fmt::Result {
            for node in nodes {
                let indent = "  ".repeat(depth);
                let key = quote_if_needed(&node.schema_key());
                if node.children().is_empty() {
                    writeln!(f, "{indent}- {key}")?;
                } else {
                    writeln!(f, "{indent}- {key}:")?;
                    write_nodes(f, node.children(), depth + 1)?;
                }
            }
            Ok(())
        }

        write_nodes(f, &self.nodes, 0)
    }
}

/// Conversion into a compiled schema.
///
/// Lets matchers accept dash-list text, nested-list literals and built
/// schemas interchangeably.
pub trait IntoStructureSchema {
    /// Compiles `self`.
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError>;
}

impl IntoStructureSchema for StructureSchema {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        Ok(self)
    }
}

impl IntoStructureSchema for &StructureSchema {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        Ok(self.clone())
    }
}

impl IntoStructureSchema for Vec<StructureNode> {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        Ok(StructureSchema::new(self))
    }
}

impl IntoStructureSchema for &str {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        StructureSchema::parse(self)
    }
}

impl IntoStructureSchema for String {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        StructureSchema::parse(&self)
    }
}

impl IntoStructureSchema for &Value {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        StructureSchema::from_value(self)
    }
}

impl IntoStructureSchema for Value {
    fn into_structure_schema(self) -> Result<StructureSchema, SchemaError> {
        StructureSchema::from_value(&self)
    }
}

/// Merges the mapping elements of a sequence; later elements win on
/// duplicate keys and non-mapping elements are skipped.
pub(crate) fn union_fields(items: &[Value]) -> Map<String, Value> {
    let mut merged = Map::new();
    for item in items {
        if let Value::Object(fields) = item {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn checked_key(name: &str) -> Result<&str, SchemaError> {
    if name.is_empty() {
        return Err(SchemaError::invalid_literal("empty key"));
    }
    Ok(name)
}

fn quote_if_needed(key: &str) -> String {
    let needs_quotes = key.is_empty()
        || key.trim() != key
        || key.ends_with(':')
        || key.contains(": ")
        || key.contains(" #")
        || key.starts_with(['#', '-', '"', '\'']);

    if !needs_quotes {
        key.to_string()
    } else if key.contains('"') {
        format!("'{key}'")
    } else {
        format!("\"{key}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_body() -> Value {
        json!({
            "user": {"name": "Ann", "email": "ann@example.com"},
            "products": [
                {"name": "pen", "price": 1},
                {"name": "ink", "price": 2}
            ]
        })
    }

    #[test]
    fn test_literal_schema_matches() {
        let schema = StructureSchema::from_value(&json!([
            ["user", ["name", "email"]],
            ["products*", ["name", "price"]]
        ]))
        .unwrap();

        assert!(schema.is_satisfied_by(&order_body()));
    }

    #[test]
    fn test_entries_are_a_required_subset() {
        let schema = StructureSchema::from_value(&json!([
            ["user", ["name"]],
            ["products*", ["name", "price"]]
        ]))
        .unwrap();

        assert!(schema.is_satisfied_by(&order_body()));
    }

    #[test]
    fn test_missing_positions_are_reported() {
        let schema = StructureSchema::from_value(&json!([
            "orderId",
            ["user", ["name", "phone"]],
            ["products*", ["sku"]]
        ]))
        .unwrap();

        assert_eq!(
            schema.missing_in(&order_body()),
            vec!["orderId", "user.phone", "products*.sku"]
        );
    }

    #[test]
    fn test_wildcard_uses_union_of_elements() {
        let body = json!({"items": [{"a": 1}, {"b": 2}, "scalar"]});
        let schema = StructureSchema::new(vec![StructureNode::each(
            "items",
            vec![StructureNode::key("a"), StructureNode::key("b")],
        )]);

        assert!(schema.is_satisfied_by(&body));
    }

    #[test]
    fn test_literal_star_key_round_trips() {
        let schema = StructureSchema::new(vec![
            StructureNode::key("rate*"),
            StructureNode::nested("grade*", vec![StructureNode::key("a")]),
            StructureNode::each("items", vec![StructureNode::key("id")]),
        ]);
        let body = json!({"rate*": 3, "grade*": {"a": 1}, "items": [{"id": 1}]});

        let text: StructureSchema = schema.to_string().parse().unwrap();
        let literal = StructureSchema::from_value(&schema.to_value()).unwrap();

        assert_eq!(schema.to_value(), json!(["rate\\*", ["grade\\*", ["a"]], ["items*", ["id"]]]));
        assert_eq!(text, schema);
        assert_eq!(literal, schema);
        assert!(text.is_satisfied_by(&body));
        assert_eq!(schema.missing_in(&json!({"rate": 3})), vec!["rate\\*", "grade\\*", "items*"]);
    }

    #[test]
    fn test_wildcard_requires_sequence() {
        let body = json!({"items": {"a": 1}});
        let schema = StructureSchema::from_value(&json!([["items*", ["a"]]])).unwrap();
        assert_eq!(schema.missing_in(&body), vec!["items*"]);
    }

    #[test]
    fn test_wildcard_over_empty_sequence() {
        let body = json!({"items": []});
        let bare = StructureSchema::from_value(&json!(["items*"])).unwrap();
        let nested = StructureSchema::from_value(&json!([["items*", ["id"]]])).unwrap();

        assert!(bare.is_satisfied_by(&body));
        assert_eq!(nested.missing_in(&body), vec!["items*.id"]);
    }

    #[test]
    fn test_nested_over_scalar_reports_children() {
        let body = json!({"user": "Ann"});
        let schema = StructureSchema::from_value(&json!([["user", ["name"]]])).unwrap();
        assert_eq!(schema.missing_in(&body), vec!["user.name"]);
    }

    #[test]
    fn test_non_object_root() {
        let schema = StructureSchema::from_value(&json!(["id"])).unwrap();
        assert_eq!(schema.missing_in(&json!([{"id": 1}])), vec!["id"]);
        assert!(StructureSchema::default().is_satisfied_by(&json!(42)));
    }

    #[test]
    fn test_literal_single_string_child() {
        let schema = StructureSchema::from_value(&json!([["user", "name"]])).unwrap();
        assert_eq!(
            schema.nodes(),
            [StructureNode::nested("user", vec![StructureNode::key("name")])]
        );
    }

    #[test]
    fn test_invalid_literals() {
        assert!(StructureSchema::from_value(&json!({"user": []})).is_err());
        assert!(StructureSchema::from_value(&json!([42])).is_err());
        assert!(StructureSchema::from_value(&json!([["a", ["b"], "c"]])).is_err());
        assert!(StructureSchema::from_value(&json!([""])).is_err());
    }

    #[test]
    fn test_literal_round_trip() {
        let literal = json!(["id", ["user", ["name"]], ["tags*", []], "items*"]);
        let schema = StructureSchema::from_value(&literal).unwrap();
        assert_eq!(schema.to_value(), json!(["id", ["user", ["name"]], "tags*", "items*"]));
        assert_eq!(StructureSchema::from_value(&schema.to_value()).unwrap(), schema);
    }

    #[test]
    fn test_display_round_trip() {
        let schema = StructureSchema::new(vec![
            StructureNode::key("id"),
            StructureNode::nested("user", vec![StructureNode::key("full name")]),
            StructureNode::each("items", vec![StructureNode::key("price: usd")]),
        ]);

        let text = schema.to_string();
        assert_eq!(
            text,
            "- id\n- user:\n  - full name\n- items*:\n  - \"price: usd\"\n"
        );
        assert_eq!(StructureSchema::parse(&text).unwrap(), schema);
    }

    #[test]
    fn test_into_structure_schema_forms_agree() {
        let from_text = "- user:\n  - name".into_structure_schema().unwrap();
        let from_value = json!([["user", ["name"]]]).into_structure_schema().unwrap();
        let from_nodes = vec![StructureNode::nested("user", vec![StructureNode::key("name")])]
            .into_structure_schema()
            .unwrap();

        assert_eq!(from_text, from_value);
        assert_eq!(from_value, from_nodes);
    }
}
