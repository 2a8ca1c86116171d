//! JSON body matchers.
//!
//! Every matcher takes a response, obtains its decoded body through the
//! [`JsonBodyCache`], and returns a [`MatchResult`]. Matchers that need a
//! JSON body short-circuit with the "Invalid JSON response received" failure
//! when the body does not decode.
//!
//! Passing verdicts carry the negated message, used when an assertion is
//! inverted.

use crate::cache::{CacheConfig, JsonBodyCache};
use crate::compare::{deep_equals, strict_equals};
use crate::error::{JsonFailure, SchemaError};
use crate::path::JsonPath;
use crate::schema::IntoStructureSchema;
use assay_core::{HttpResponse, MatchResult};
use serde_json::Value;
use std::sync::Arc;

/// The JSON matcher engine.
///
/// # Example
///
/// ```
/// use assay_core::TestResponse;
/// use assay_json::JsonMatchers;
/// use http::StatusCode;
/// use serde_json::json;
///
/// let matchers = JsonMatchers::new();
/// let response = TestResponse::json(
///     StatusCode::OK,
///     &json!({"orderId": 7, "user": {"fullname": "Ann Lee"}}),
/// );
///
/// assert!(matchers.has_path_matching(&response, "user.fullname", Some(&json!("Ann Lee"))).is_pass());
///
/// let missing = matchers.has_path_matching(&response, "user.age", None);
/// assert_eq!(missing.message(), "Expected path \"user.age\" not found");
/// ```
#[derive(Debug, Default)]
pub struct JsonMatchers {
    cache: JsonBodyCache,
}

impl JsonMatchers {
    /// Creates an engine with a default cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given cache configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_cache(JsonBodyCache::new(config))
    }

    /// Creates an engine around an existing cache.
    pub fn with_cache(cache: JsonBodyCache) -> Self {
        Self { cache }
    }

    /// The body cache used by this engine.
    pub fn cache(&self) -> &JsonBodyCache {
        &self.cache
    }

    /// Passes if the body decodes as JSON.
    pub fn is_json<R>(&self, response: &R) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        match self.decode(response) {
            Ok(_) => negated("Expected response body not to be valid JSON"),
            Err(failure) => failure,
        }
    }

    /// Passes if the body is a JSON object.
    pub fn is_json_object<R>(&self, response: &R) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        match self.decode(response) {
            Ok(body) if body.is_object() => negated("Expected response content not to be a JSON object"),
            Ok(_) => failed(JsonFailure::NotAnObject),
            Err(failure) => failure,
        }
    }

    /// Passes if the body is a JSON array.
    pub fn is_json_array<R>(&self, response: &R) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        match self.decode(response) {
            Ok(body) if body.is_array() => negated("Expected response content not to be a JSON array"),
            Ok(_) => failed(JsonFailure::NotAnArray),
            Err(failure) => failure,
        }
    }

    /// Passes if the body deeply equals `expected`.
    ///
    /// Failing verdicts carry both payloads for diff display.
    pub fn equals_json<R>(&self, response: &R, expected: &Value) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        let body = match self.decode(response) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        if deep_equals(&body, expected) {
            negated("Expected JSON not to match actual JSON")
        } else {
            tracing::debug!(matcher = "equals_json", response_id = %response.id(), "body mismatch");
            failed(JsonFailure::BodyMismatch).with_diff((*body).clone(), expected.clone())
        }
    }

    /// Passes if `path` resolves, and, when `expected` is given, if the
    /// resolved value strictly equals it.
    ///
    /// Strict equality compares scalars by value; arrays and objects never
    /// compare equal. Use [`JsonMatchers::equals_json`] for deep comparison.
    pub fn has_path_matching<R>(&self, response: &R, path: &str, expected: Option<&Value>) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        let body = match self.decode(response) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        let path = JsonPath::parse(path);
        let Some(actual) = path.resolve(&body) else {
            tracing::debug!(matcher = "has_path_matching", json_path = %path, "path not found");
            return failed(JsonFailure::PathNotFound {
                path: path.to_string(),
            });
        };

        match expected {
            None => {
                let path = path.to_string();
                MatchResult::pass(move || format!("Expected path \"{path}\" not to exist"))
            }
            Some(expected) if strict_equals(actual, expected) => {
                let path = path.to_string();
                let expected = expected.clone();
                MatchResult::pass(move || format!("Expected path \"{path}\" not to have value {expected}"))
            }
            Some(expected) => failed(JsonFailure::PathValueMismatch {
                path: path.to_string(),
                expected: expected.clone(),
                actual: actual.clone(),
            })
            .with_diff(actual.clone(), expected.clone()),
        }
    }

    /// Passes if the length of the root (or of the array at `path`) equals
    /// `expected`.
    ///
    /// Without a path the root must be an object or an array. An object root
    /// counts as length 0 regardless of its keys. With a path, the path must
    /// resolve to an array.
    pub fn has_length_at<R>(&self, response: &R, expected: usize, path: Option<&str>) -> MatchResult
    where
        R: HttpResponse + ?Sized,
    {
        let body = match self.decode(response) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        match path {
            None => match &*body {
                Value::Array(items) => length_verdict(expected, items.len()),
                Value::Object(_) => length_verdict(expected, 0),
                _ => failed(JsonFailure::NotObjectOrArray),
            },
            Some(path) => self
                .has_path_matching(response, path, None)
                .and_then(|| match JsonPath::parse(path).resolve(&body) {
                    Some(Value::Array(items)) => length_verdict(expected, items.len()),
                    _ => failed(JsonFailure::TargetNotAnArray),
                }),
        }
    }

    /// Passes if the body contains every entry required by `schema`.
    ///
    /// `schema` may be dash-list text, a nested-list literal or a compiled
    /// [`StructureSchema`](crate::StructureSchema).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema does not compile. This is checked
    /// before the body is decoded.
    pub fn matches_structure<R, S>(&self, response: &R, schema: S) -> Result<MatchResult, SchemaError>
    where
        R: HttpResponse + ?Sized,
        S: IntoStructureSchema,
    {
        let schema = schema.into_structure_schema()?;

        let body = match self.decode(response) {
            Ok(body) => body,
            Err(failure) => return Ok(failure),
        };

        let missing = schema.missing_in(&body);
        if missing.is_empty() {
            return Ok(negated("Expected JSON not to match structure"));
        }

        tracing::debug!(matcher = "matches_structure", missing = ?missing, "structure mismatch");
        Ok(failed(JsonFailure::StructureMismatch { missing }).with_diff((*body).clone(), schema.to_value()))
    }

    fn decode<R>(&self, response: &R) -> Result<Arc<Value>, MatchResult>
    where
        R: HttpResponse + ?Sized,
    {
        self.cache
            .get_or_decode(response)
            .map_err(|_| failed(JsonFailure::InvalidJson))
    }
}

fn failed(failure: JsonFailure) -> MatchResult {
    MatchResult::fail(move || failure.to_string())
}

fn negated(message: &'static str) -> MatchResult {
    MatchResult::pass(move || message.to_string())
}

fn length_verdict(expected: usize, actual: usize) -> MatchResult {
    if actual == expected {
        MatchResult::pass(move || format!("Expected json not to have length \"{expected}\""))
    } else {
        failed(JsonFailure::LengthMismatch { expected, actual })
            .with_diff(Value::from(actual), Value::from(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{StructureNode, StructureSchema};
    use assay_core::TestResponse;
    use http::{HeaderMap, StatusCode};
    use proptest::prelude::*;
    use serde_json::{json, Map};

    fn json_response(body: &Value) -> TestResponse {
        TestResponse::json(StatusCode::OK, body)
    }

    fn text_response(body: &str) -> TestResponse {
        TestResponse::text(StatusCode::OK, body)
    }

    fn order() -> TestResponse {
        json_response(&json!({"orderId": 7, "user": {"fullname": "Ann Lee"}}))
    }

    #[test]
    fn test_is_json() {
        let matchers = JsonMatchers::new();
        assert!(matchers.is_json(&json_response(&json!({"a": 1}))).is_pass());
        assert!(matchers.is_json(&text_response("42")).is_pass());

        let result = matchers.is_json(&text_response("Hello"));
        assert!(!result.is_pass());
        assert_eq!(result.message(), "Invalid JSON response received");
    }

    #[test]
    fn test_object_and_array_classification() {
        let matchers = JsonMatchers::new();
        let object = json_response(&json!({"a": [1]}));
        let array = json_response(&json!([{"a": 1}]));

        assert!(matchers.is_json_object(&object).is_pass());
        assert!(!matchers.is_json_array(&object).is_pass());
        assert!(matchers.is_json_array(&array).is_pass());

        let result = matchers.is_json_object(&array);
        assert_eq!(result.message(), "Response content is not a JSON object");
        let result = matchers.is_json_array(&json_response(&json!("text")));
        assert_eq!(result.message(), "Response content is not a JSON array");
    }

    #[test]
    fn test_shape_matchers_require_json() {
        let matchers = JsonMatchers::new();
        let response = text_response("{oops");
        assert_eq!(
            matchers.is_json_object(&response).message(),
            "Invalid JSON response received"
        );
        assert_eq!(
            matchers.is_json_array(&response).message(),
            "Invalid JSON response received"
        );
    }

    #[test]
    fn test_equals_json() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({"name": "pen", "tags": ["a", "b"]}));

        assert!(matchers
            .equals_json(&response, &json!({"tags": ["a", "b"], "name": "pen"}))
            .is_pass());

        let result = matchers.equals_json(&response, &json!({"name": "ink"}));
        assert!(!result.is_pass());
        assert_eq!(result.message(), "Expected JSON not matches actual JSON");
        assert_eq!(result.expected(), Some(&json!({"name": "ink"})));
        assert_eq!(result.actual().unwrap()["name"], "pen");
    }

    #[test]
    fn test_has_path_matching() {
        let matchers = JsonMatchers::new();
        let response = order();

        assert!(matchers
            .has_path_matching(&response, "user.fullname", Some(&json!("Ann Lee")))
            .is_pass());
        assert!(matchers.has_path_matching(&response, "orderId", None).is_pass());

        let result = matchers.has_path_matching(&response, "user.age", None);
        assert_eq!(result.message(), "Expected path \"user.age\" not found");

        let result = matchers.has_path_matching(&response, "user.fullname", Some(&json!("Bob")));
        assert_eq!(
            result.message(),
            "Expected path \"user.fullname\" to have value \"Bob\", but \"Ann Lee\" received"
        );
        assert_eq!(result.actual(), Some(&json!("Ann Lee")));
    }

    #[test]
    fn test_path_value_is_shallow() {
        let matchers = JsonMatchers::new();
        let response = order();

        let result = matchers.has_path_matching(&response, "user", Some(&json!({"fullname": "Ann Lee"})));
        assert!(!result.is_pass());
    }

    #[test]
    fn test_length_of_root_array() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!([1, 2, 3, 4, 5]));

        assert!(matchers.has_length_at(&response, 5, None).is_pass());

        let result = matchers.has_length_at(&response, 3, None);
        assert_eq!(
            result.message(),
            "Expected json to have length \"3\", but \"5\" received"
        );
    }

    #[test]
    fn test_length_of_object_root_is_zero() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({"a": 1, "b": 2}));

        assert!(matchers.has_length_at(&response, 0, None).is_pass());
        assert_eq!(
            matchers.has_length_at(&response, 2, None).message(),
            "Expected json to have length \"2\", but \"0\" received"
        );
    }

    #[test]
    fn test_length_of_scalar_root() {
        let matchers = JsonMatchers::new();
        let result = matchers.has_length_at(&text_response("\"abc\""), 3, None);
        assert_eq!(result.message(), "Invalid JSON object or array");
    }

    #[test]
    fn test_length_at_path() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({
            "category": {"name": "tools", "products": [1, 2, 3, 4, 5]}
        }));

        assert!(matchers
            .has_length_at(&response, 5, Some("category.products"))
            .is_pass());
        assert_eq!(
            matchers
                .has_length_at(&response, 3, Some("category.products"))
                .message(),
            "Expected json to have length \"3\", but \"5\" received"
        );
        assert_eq!(
            matchers
                .has_length_at(&response, 1, Some("category.name"))
                .message(),
            "Target value is not an Array"
        );
        assert_eq!(
            matchers
                .has_length_at(&response, 1, Some("category.items"))
                .message(),
            "Expected path \"category.items\" not found"
        );
    }

    #[test]
    fn test_matches_structure() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({
            "user": {"name": "Ann", "email": "ann@example.com"},
            "products": [{"name": "pen", "price": 1}, {"name": "ink", "price": 2}]
        }));

        let literal = json!([["user", ["name", "email"]], ["products*", ["name", "price"]]]);
        assert!(matchers.matches_structure(&response, &literal).unwrap().is_pass());

        let subset = json!([["user", ["name"]], ["products*", ["name", "price"]]]);
        assert!(matchers.matches_structure(&response, &subset).unwrap().is_pass());

        let text = "- user:\n  - phone\n- products*:\n  - sku";
        let result = matchers.matches_structure(&response, text).unwrap();
        assert_eq!(
            result.message(),
            "Expected JSON to match structure, but missing: \"user.phone\", \"products*.sku\""
        );
    }

    #[test]
    fn test_matches_structure_with_nodes() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({"items": [{"id": 1}, {"id": 2}]}));
        let schema = StructureSchema::new(vec![StructureNode::each("items", vec![StructureNode::key("id")])]);

        assert!(matchers.matches_structure(&response, &schema).unwrap().is_pass());
    }

    #[test]
    fn test_malformed_schema_is_an_error() {
        let matchers = JsonMatchers::new();
        let response = text_response("not json");

        let err = matchers.matches_structure(&response, "user").unwrap_err();
        assert_eq!(err, SchemaError::NotAList);
    }

    #[test]
    fn test_matchers_share_one_decode() {
        let matchers = JsonMatchers::new();
        let response = order();

        matchers.is_json(&response);
        matchers.is_json_object(&response);
        matchers.has_path_matching(&response, "orderId", None);
        matchers.has_length_at(&response, 0, None);

        assert_eq!(matchers.cache().stats().misses, 1);
    }

    #[test]
    fn test_sequential_responses_are_isolated() {
        let matchers = JsonMatchers::new();
        let first = json_response(&json!({"name": "first"}));
        let second = json_response(&json!({"name": "second"}));

        assert!(matchers
            .has_path_matching(&first, "name", Some(&json!("first")))
            .is_pass());
        assert!(matchers
            .has_path_matching(&second, "name", Some(&json!("second")))
            .is_pass());
    }

    #[test]
    fn test_passing_verdicts_carry_negated_messages() {
        let matchers = JsonMatchers::new();
        let response = order();

        assert_eq!(
            matchers.has_path_matching(&response, "orderId", None).message(),
            "Expected path \"orderId\" not to exist"
        );
        assert_eq!(
            matchers.is_json(&response).message(),
            "Expected response body not to be valid JSON"
        );
    }

    #[test]
    fn test_body_with_byte_order_mark() {
        let matchers = JsonMatchers::new();
        let response = TestResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            &b"\xEF\xBB\xBF{\"items\": [1, 2]}"[..],
        );

        assert!(matchers.is_json(&response).is_pass());
        assert!(matchers.is_json_object(&response).is_pass());
        assert!(matchers.has_length_at(&response, 2, Some("items")).is_pass());
    }

    #[test]
    fn test_length_at_missing_path_skips_array_check() {
        let matchers = JsonMatchers::new();
        let response = json_response(&json!({"items": "none"}));

        let result = matchers.has_length_at(&response, 1, Some("items.0"));
        assert_eq!(result.message(), "Expected path \"items.0\" not found");
        assert!(result.actual().is_none());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z ]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn reverse_keys(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), reverse_keys(v)))
                    .collect::<Map<_, _>>(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(reverse_keys).collect()),
            other => other.clone(),
        }
    }

    proptest! {
        #[test]
        fn prop_serialized_values_classify_by_shape(value in arb_json()) {
            let matchers = JsonMatchers::new();
            let response = json_response(&value);

            prop_assert!(matchers.is_json(&response).is_pass());
            prop_assert_eq!(matchers.is_json_object(&response).is_pass(), value.is_object());
            prop_assert_eq!(matchers.is_json_array(&response).is_pass(), value.is_array());
        }

        #[test]
        fn prop_body_equals_its_value_in_any_key_order(value in arb_json()) {
            let matchers = JsonMatchers::new();
            let response = json_response(&value);

            prop_assert!(matchers.equals_json(&response, &value).is_pass());
            prop_assert!(matchers.equals_json(&response, &reverse_keys(&value)).is_pass());
        }

        #[test]
        fn prop_non_json_text_is_rejected(body in "x[a-z {}]{0,12}") {
            let result = JsonMatchers::new().is_json(&text_response(&body));

            prop_assert!(!result.is_pass());
            prop_assert_eq!(result.message(), "Invalid JSON response received");
        }
    }
}
