//! Value comparison used by the matchers.
//!
//! Numbers compare by numeric value, so `1` and `1.0` are equal even though
//! `serde_json` stores them differently.

use serde_json::{Number, Value};

/// Deep structural equality.
///
/// Sequences compare element-wise in order; mappings compare by key set and
/// per-key value, ignoring key order.
pub fn deep_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equals(x, y)))
        }
        _ => actual == expected,
    }
}

/// Strict equality for path values.
///
/// Scalars compare by value. Sequences and mappings never compare equal,
/// matching identity semantics for freshly decoded composites.
pub fn strict_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        _ => actual == expected,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    #[test]
    fn test_deep_equals_ignores_key_order() {
        let a = json!({"a": 1, "b": [1, 2]});
        let b: Value = serde_json::from_str(r#"{"b": [1, 2], "a": 1}"#).unwrap();
        assert!(deep_equals(&a, &b));
    }

    #[test]
    fn test_deep_equals_sequence_order_matters() {
        assert!(!deep_equals(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equals(&json!([1]), &json!([1, 1])));
    }

    #[test]
    fn test_deep_equals_key_sets() {
        assert!(!deep_equals(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!deep_equals(&json!({"a": 1, "b": 2}), &json!({"a": 1})));
        assert!(!deep_equals(&json!({"a": null}), &json!({"b": null})));
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(deep_equals(&json!(1), &json!(1.0)));
        assert!(deep_equals(&json!(-3), &json!(-3)));
        assert!(deep_equals(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!deep_equals(&json!(1), &json!(2)));
        assert!(!deep_equals(&json!(1), &json!("1")));
    }

    #[test]
    fn test_strict_equals_scalars() {
        assert!(strict_equals(&json!("Ann Lee"), &json!("Ann Lee")));
        assert!(strict_equals(&json!(7), &json!(7.0)));
        assert!(strict_equals(&Value::Null, &Value::Null));
        assert!(!strict_equals(&json!(true), &json!(1)));
    }

    #[test]
    fn test_strict_equals_rejects_composites() {
        assert!(!strict_equals(&json!([1]), &json!([1])));
        assert!(!strict_equals(&json!({"a": 1}), &json!({"a": 1})));
        assert!(!strict_equals(&json!("x"), &json!(["x"])));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(Value::String),
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
            Value::Object(map) => {
                let reversed: Map<String, Value> = map
                    .iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), reverse_keys(v)))
                    .collect();
                Value::Object(reversed)
            }
            Value::Array(items) => Value::Array(items.iter().map(reverse_keys).collect()),
            other => other.clone(),
        }
    }

    proptest! {
        #[test]
        fn prop_serialized_value_equals_itself_in_any_key_order(value in arb_json()) {
            let decoded: Value = serde_json::from_str(&value.to_string()).unwrap();
            prop_assert!(deep_equals(&decoded, &value));
            prop_assert!(deep_equals(&decoded, &reverse_keys(&value)));
        }
    }
}
