//! Error types for spatial alignment.

use grid_common::DatasetError;
use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while aligning and annotating a dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// Offsets for an axis could not be recovered from the dataset metadata.
    #[error("failed to parse {axis} offsets: {reason}")]
    MetadataParse { axis: String, reason: String },

    /// Sliced template coordinates do not line up with the target grid.
    #[error("dimension mismatch on {axis}: expected {expected}, got {actual}")]
    DimensionMismatch {
        axis: String,
        expected: usize,
        actual: usize,
    },

    /// Projection setup or transform failed.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// A required dimension, variable or attribute is missing.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AlignmentError {
    /// Create a MetadataParse error.
    pub fn metadata_parse(axis: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MetadataParse {
            axis: axis.into(),
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(axis: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            axis: axis.into(),
            expected,
            actual,
        }
    }
}

/// Result type for alignment operations.
pub type Result<T> = std::result::Result<T, AlignmentError>;
