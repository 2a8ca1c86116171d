//! Error and failure types for JSON matchers.
//!
//! Two families live here:
//!
//! - [`DecodeError`] and [`SchemaError`] are real errors. A decode error is
//!   turned into a failing verdict by the matchers; a schema error is a
//!   programmer error and is returned to the caller.
//! - [`JsonFailure`] describes why a matcher verdict failed. Its `Display`
//!   output is the user-facing failure message.

use serde_json::Value;
use thiserror::Error;

/// The response body is not syntactically valid JSON.
#[derive(Debug, Error)]
#[error("failed to decode JSON body: {source}")]
pub struct DecodeError {
    #[from]
    source: serde_json::Error,
}

impl DecodeError {
    /// Line of the syntax error (1-based).
    pub fn line(&self) -> usize {
        self.source.line()
    }

    /// Column of the syntax error (1-based).
    pub fn column(&self) -> usize {
        self.source.column()
    }
}

/// A structure schema could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema text does not start with a dash list item.
    #[error("structure schema must be a dash list (first item must start with '-')")]
    NotAList,

    /// Schema text is malformed at a given line.
    #[error("invalid structure schema at line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A nested-list literal has an unsupported shape.
    #[error("invalid structure literal: {0}")]
    InvalidLiteral(String),
}

impl SchemaError {
    /// Create a syntax error.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid literal error.
    pub fn invalid_literal(message: impl Into<String>) -> Self {
        Self::InvalidLiteral(message.into())
    }
}

/// Classification of matcher failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Body is not valid JSON.
    Parse,
    /// Addressed path is absent.
    PathNotFound,
    /// Object/array discriminant does not match.
    ShapeMismatch,
    /// Equality, length or structure check failed.
    ValueMismatch,
}

/// Why a JSON matcher failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonFailure {
    /// Body could not be decoded.
    #[error("Invalid JSON response received")]
    InvalidJson,

    /// Root is not a mapping.
    #[error("Response content is not a JSON object")]
    NotAnObject,

    /// Root is not a sequence.
    #[error("Response content is not a JSON array")]
    NotAnArray,

    /// Deep equality failed.
    #[error("Expected JSON not matches actual JSON")]
    BodyMismatch,

    /// Path could not be resolved.
    #[error("Expected path \"{path}\" not found")]
    PathNotFound {
        /// The requested path.
        path: String,
    },

    /// Path resolved to a different value.
    #[error("Expected path \"{path}\" to have value {expected}, but {actual} received")]
    PathValueMismatch {
        /// The requested path.
        path: String,
        /// Expected value.
        expected: Value,
        /// Value found at the path.
        actual: Value,
    },

    /// Root is neither a mapping nor a sequence.
    #[error("Invalid JSON object or array")]
    NotObjectOrArray,

    /// Value at the path is not a sequence.
    #[error("Target value is not an Array")]
    TargetNotAnArray,

    /// Length differs.
    #[error("Expected json to have length \"{expected}\", but \"{actual}\" received")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Required structure entries are missing.
    #[error("Expected JSON to match structure, but missing: {}", format_missing(.missing))]
    StructureMismatch {
        /// Positions that were required but absent.
        missing: Vec<String>,
    },
}

impl JsonFailure {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidJson => FailureKind::Parse,
            Self::PathNotFound { .. } => FailureKind::PathNotFound,
            Self::NotAnObject | Self::NotAnArray | Self::NotObjectOrArray | Self::TargetNotAnArray => {
                FailureKind::ShapeMismatch
            }
            Self::BodyMismatch
            | Self::PathValueMismatch { .. }
            | Self::LengthMismatch { .. }
            | Self::StructureMismatch { .. } => FailureKind::ValueMismatch,
        }
    }
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("\"{m}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
