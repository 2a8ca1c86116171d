//! Header matchers.

use assay_core::{HttpResponse, MatchResult};

/// Returns all values of a header joined with `", "`, or `None` if absent.
///
/// Header names are case-insensitive. Values that are not visible ASCII are
/// decoded lossily.
pub fn header_value<R>(response: &R, name: &str) -> Option<String>
where
    R: HttpResponse + ?Sized,
{
    let values: Vec<String> = response
        .headers()
        .get_all(name)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Passes if the header is present and, when `expected` is given, if its
/// value equals `expected`.
pub fn has_header<R>(response: &R, name: &str, expected: Option<&str>) -> MatchResult
where
    R: HttpResponse + ?Sized,
{
    let name = name.to_string();
    let Some(actual) = header_value(response, &name) else {
        tracing::debug!(matcher = "has_header", header = %name, "header missing");
        return MatchResult::fail(move || format!("Header \"{name}\" not found"));
    };

    match expected {
        None => MatchResult::pass(move || format!("Expected header \"{name}\" not to be present")),
        Some(expected) if expected == actual => {
            let expected = expected.to_string();
            MatchResult::pass(move || {
                format!("Expected header \"{name}\" not to have value {expected}")
            })
        }
        Some(expected) => {
            let expected = expected.to_string();
            MatchResult::fail(move || {
                format!("Expected header \"{name}\" to have value {expected}, but received {actual}")
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::TestResponse;
    use http::StatusCode;

    fn response() -> TestResponse {
        TestResponse::empty(StatusCode::OK)
            .with_header("Content-Type", "application/json")
            .unwrap()
            .with_header("Connection", "close")
            .unwrap()
    }

    #[test]
    fn test_header_present() {
        assert!(has_header(&response(), "Content-Type", None).is_pass());
        assert!(has_header(&response(), "content-type", None).is_pass());
    }

    #[test]
    fn test_header_missing() {
        let result = has_header(&response(), "Accept", None);
        assert!(!result.is_pass());
        assert_eq!(result.message(), "Header \"Accept\" not found");

        let result = has_header(&response(), "Accept", Some("text/html"));
        assert_eq!(result.message(), "Header \"Accept\" not found");
    }

    #[test]
    fn test_header_value() {
        assert!(has_header(&response(), "Content-Type", Some("application/json")).is_pass());

        let result = has_header(&response(), "Connection", Some("keep-alive"));
        assert_eq!(
            result.message(),
            "Expected header \"Connection\" to have value keep-alive, but received close"
        );
    }

    #[test]
    fn test_repeated_header_values_are_joined() {
        let mut response = response();
        response.append_header("Vary", "Accept").unwrap();
        response.append_header("Vary", "Origin").unwrap();

        assert_eq!(header_value(&response, "vary").as_deref(), Some("Accept, Origin"));
        assert!(has_header(&response, "Vary", Some("Accept, Origin")).is_pass());
    }
}
