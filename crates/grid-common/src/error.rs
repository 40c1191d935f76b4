//! Error types for dataset model operations.

use thiserror::Error;

/// Result type alias using DatasetError.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while inspecting or mutating a [`crate::Dataset`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetError {
    #[error("Missing dimension: {0}")]
    MissingDimension(String),

    #[error("Missing variable: {0}")]
    MissingVariable(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Shape mismatch for '{name}': expected {expected} values, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Index {index} out of range for dimension '{dim}' of length {len}")]
    IndexOutOfRange { dim: String, index: usize, len: usize },
}
