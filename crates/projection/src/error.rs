//! Error types for projection setup and transforms.

use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised when projection parameters are unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A parameter is outside its physical range.
    #[error("invalid projection parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },

    /// A required parameter is absent from a CRS description.
    #[error("missing projection parameter: {0}")]
    MissingParameter(String),

    /// The CRS description names a projection other than Lambert Conformal Conic.
    #[error("unsupported projection: {0}")]
    Unsupported(String),

    /// A coordinate handed to the transform was NaN or infinite.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}
