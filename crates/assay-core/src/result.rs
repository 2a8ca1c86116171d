//! Matcher verdicts.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type MessageFn = Arc<dyn Fn() -> String + Send + Sync>;

/// The verdict of a single matcher.
///
/// The message is produced lazily: building it may involve serializing large
/// payloads, and it is only needed when the verdict is reported.
///
/// # Example
///
/// ```
/// use assay_core::MatchResult;
/// use serde_json::json;
///
/// let result = MatchResult::fail(|| "Expected JSON not matches actual JSON".to_string())
///     .with_diff(json!({"a": 1}), json!({"a": 2}));
///
/// assert!(!result.is_pass());
/// assert_eq!(result.actual(), Some(&json!({"a": 1})));
/// ```
#[derive(Clone)]
pub struct MatchResult {
    pass: bool,
    message: MessageFn,
    actual: Option<Value>,
    expected: Option<Value>,
}

impl MatchResult {
    /// Creates a verdict with a lazily evaluated message.
    pub fn new<F>(pass: bool, message: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            pass,
            message: Arc::new(message),
            actual: None,
            expected: None,
        }
    }

    /// Creates a passing verdict.
    pub fn pass<F>(message: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::new(true, message)
    }

    /// Creates a failing verdict.
    pub fn fail<F>(message: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::new(false, message)
    }

    /// Attaches actual and expected payloads for diff display.
    pub fn with_diff(mut self, actual: Value, expected: Value) -> Self {
        self.actual = Some(actual);
        self.expected = Some(expected);
        self
    }

    /// Runs `next` only if this verdict passed; otherwise returns `self`.
    ///
    /// Used to express matchers that require another matcher to pass first.
    pub fn and_then<F>(self, next: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        if self.pass {
            next()
        } else {
            self
        }
    }

    /// Returns true if the matcher passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.pass
    }

    /// Evaluates and returns the message.
    #[must_use]
    pub fn message(&self) -> String {
        (self.message)()
    }

    /// Actual payload, if attached.
    #[must_use]
    pub fn actual(&self) -> Option<&Value> {
        self.actual.as_ref()
    }

    /// Expected payload, if attached.
    #[must_use]
    pub fn expected(&self) -> Option<&Value> {
        self.expected.as_ref()
    }
}

impl fmt::Debug for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("pass", &self.pass)
            .field("message", &self.message())
            .field("actual", &self.actual)
            .field("expected", &self.expected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_message_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let result = MatchResult::fail(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "boom".to_string()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.message(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let first = MatchResult::fail(|| "first".to_string());
        let result = first.and_then(|| panic!("must not run"));
        assert!(!result.is_pass());
        assert_eq!(result.message(), "first");
    }

    #[test]
    fn test_and_then_continues() {
        let result = MatchResult::pass(String::new).and_then(|| MatchResult::fail(|| "second".into()));
        assert_eq!(result.message(), "second");
    }

    #[test]
    fn test_diff_payloads() {
        let result = MatchResult::fail(String::new).with_diff(json!([1]), json!([2]));
        assert_eq!(result.actual(), Some(&json!([1])));
        assert_eq!(result.expected(), Some(&json!([2])));
        assert!(MatchResult::pass(String::new).actual().is_none());
    }
}
