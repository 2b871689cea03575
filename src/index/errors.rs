//! Index error types
//!
//! Error codes:
//! - XV_MISSING_FIELD
//! - XV_NON_SCALAR_FIELD
//! - XV_NOT_AN_OBJECT
//! - XV_UNKNOWN_DIMENSION
//! - XV_INVALID_ARGUMENT

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised while building or querying dimensions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A record lacks a field the schema expects
    #[error("Record {record} is missing field '{field}'")]
    MissingField { field: String, record: usize },

    /// A record holds an array or object where a scalar is expected
    #[error("Record {record} has a non-scalar value in field '{field}'")]
    NonScalarField { field: String, record: usize },

    /// A collection entry is not a JSON object
    #[error("Record {record} is not an object")]
    NotAnObject { record: usize },

    /// A field name outside the loaded schema
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// Unrecognized direction or malformed filter bound
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IndexError {
    /// Returns the stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::MissingField { .. } => "XV_MISSING_FIELD",
            IndexError::NonScalarField { .. } => "XV_NON_SCALAR_FIELD",
            IndexError::NotAnObject { .. } => "XV_NOT_AN_OBJECT",
            IndexError::UnknownDimension(_) => "XV_UNKNOWN_DIMENSION",
            IndexError::InvalidArgument(_) => "XV_INVALID_ARGUMENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = IndexError::MissingField {
            field: "age".into(),
            record: 3,
        };
        assert_eq!(err.code(), "XV_MISSING_FIELD");
        assert_eq!(
            IndexError::UnknownDimension("x".into()).code(),
            "XV_UNKNOWN_DIMENSION"
        );
    }

    #[test]
    fn test_error_display() {
        let err = IndexError::MissingField {
            field: "age".into(),
            record: 3,
        };
        let display = err.to_string();
        assert!(display.contains("age"));
        assert!(display.contains('3'));
    }
}
