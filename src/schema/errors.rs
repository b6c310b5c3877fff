//! Schema configuration errors
//!
//! These signal a defect in a record-type declaration, never bad data, and
//! are returned at the point of first misuse:
//! - SCHEMA_NOT_EMBEDDED: embedded/list field over a top-level record type
//! - SCHEMA_EMBEDDED_TYPE_MISMATCH: element of the wrong embedded type
//! - SCHEMA_INVALID_DEFAULT: declared default fails its field's contract
//! - SCHEMA_INVALID_PATTERN: `pattern` that is not a valid regex
//! - SCHEMA_UNKNOWN_FIELD: assignment to an undeclared field

use std::fmt;

use thiserror::Error;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    NotEmbedded,
    EmbeddedTypeMismatch,
    InvalidDefault,
    InvalidPattern,
    UnknownField,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NotEmbedded => "SCHEMA_NOT_EMBEDDED",
            SchemaErrorCode::EmbeddedTypeMismatch => "SCHEMA_EMBEDDED_TYPE_MISMATCH",
            SchemaErrorCode::InvalidDefault => "SCHEMA_INVALID_DEFAULT",
            SchemaErrorCode::InvalidPattern => "SCHEMA_INVALID_PATTERN",
            SchemaErrorCode::UnknownField => "SCHEMA_UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration error in a record-type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("expected {found} to be an embedded document type")]
    NotEmbedded { found: String },

    #[error("expected {found} to be a subtype of {expected}")]
    EmbeddedTypeMismatch { expected: String, found: String },

    #[error("default for '{field}' must be {expected}, found {found}")]
    InvalidDefault {
        field: String,
        expected: String,
        found: String,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{schema} has no field named '{field}'")]
    UnknownField { schema: String, field: String },
}

impl SchemaError {
    pub fn unknown_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        SchemaError::UnknownField {
            schema: schema.into(),
            field: field.into(),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        match self {
            SchemaError::NotEmbedded { .. } => SchemaErrorCode::NotEmbedded,
            SchemaError::EmbeddedTypeMismatch { .. } => SchemaErrorCode::EmbeddedTypeMismatch,
            SchemaError::InvalidDefault { .. } => SchemaErrorCode::InvalidDefault,
            SchemaError::InvalidPattern { .. } => SchemaErrorCode::InvalidPattern,
            SchemaError::UnknownField { .. } => SchemaErrorCode::UnknownField,
        }
    }
}

/// Result type for schema declaration and construction.
pub type SchemaResult<T> = Result<T, SchemaError>;
