//! View error types
//!
//! Every error is surfaced synchronously to the caller of the offending
//! command. A rejected command leaves state and the last emitted view as
//! they were.

use thiserror::Error;

use crate::index::IndexError;

/// Result type for view and controller operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised by view commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Filter or sort references a field absent from the schema
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// Unrecognized sort direction, zero page number, negative values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Collection could not be indexed
    #[error(transparent)]
    Index(IndexError),
}

impl ViewError {
    /// Returns the stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::UnknownDimension(_) => "XV_UNKNOWN_DIMENSION",
            ViewError::InvalidArgument(_) => "XV_INVALID_ARGUMENT",
            ViewError::Index(e) => e.code(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ViewError::InvalidArgument(msg.into())
    }
}

impl From<IndexError> for ViewError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::UnknownDimension(field) => ViewError::UnknownDimension(field),
            IndexError::InvalidArgument(msg) => ViewError::InvalidArgument(msg),
            other => ViewError::Index(other),
        }
    }
}
