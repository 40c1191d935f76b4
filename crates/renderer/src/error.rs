//! Error types for rendering.

use grid_common::DatasetError;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Coordinate arrays have {actual} values, field has {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Field '{0}' has no finite values to draw")]
    NoFiniteValues(String),

    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
