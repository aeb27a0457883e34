//! Error types for the msgforge runtime.
//!
//! Validation errors are produced when constructing or updating message
//! instances; decode errors are produced by the wire codecs. Construction
//! fails fast with a single [`ValidationError`], while bulk validation
//! collects every failure into [`ValidationIssues`] without failing.

use thiserror::Error;

/// A single field validation failure.
///
/// Carries the field name, a human-readable message, a rendering of the
/// offending value, and a stable machine-readable error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for field `{field}`: {message} (got {value}) [{code}]")]
pub struct ValidationError {
    /// Name of the field that failed validation.
    pub field: String,

    /// Human-readable description of the violated constraint.
    pub message: String,

    /// Rendering of the offending value.
    pub value: String,

    /// Stable error code, e.g. `"range.min"` or `"union.unmatched"`.
    pub code: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.into(),
            code: code.into(),
        }
    }
}

/// An aggregate of validation failures.
///
/// Returned by `validate_all`-style entry points, which never fail early:
/// every field is checked and every violation is collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationIssues {
    errors: Vec<ValidationError>,
}

impl ValidationIssues {
    /// Create an empty issue collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record every failure from another collector.
    pub fn extend(&mut self, other: ValidationIssues) {
        self.errors.extend(other.errors);
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The recorded failures, in the order they were collected.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consume the collector, yielding the failures.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Convert into a `Result`: `Ok` when empty, the first error otherwise.
    pub fn into_result(mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.remove(0))
        }
    }
}

impl From<ValidationError> for ValidationIssues {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationIssues {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Error produced while decoding a wire payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not valid JSON.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope is missing its `$type` discriminator.
    #[error("tagged envelope is missing the `$type` discriminator")]
    MissingTypeId,

    /// The envelope names a type this decoder does not handle.
    #[error("payload is typed `{found}`, expected `{expected}`")]
    TypeMismatch { expected: String, found: String },

    /// The envelope names a type unknown to the registry.
    #[error("unknown message type `{0}`")]
    UnknownType(String),

    /// A required field is absent from the payload.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// A field value has the wrong JSON shape.
    #[error("field `{field}`: expected {expected}")]
    WrongType { field: String, expected: String },

    /// A compact payload in an embedded context has no discriminator prefix.
    #[error("compact payload is missing its discriminator prefix")]
    MissingDiscriminator,

    /// A union value matched none of the declared member types.
    #[error("field `{field}`: value matched no union member")]
    UnmatchedUnion { field: String },

    /// Decoded content failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DecodeError {
    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a wrong type error.
    pub fn wrong_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::WrongType {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
