//! Error types for NetCDF I/O.

use grid_common::DatasetError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading, writing and fetching.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// libnetcdf refused to open a file or URL
    #[error("Failed to open '{location}': {reason}")]
    Open { location: String, reason: String },

    /// A variable or attribute could not be read
    #[error("Failed to read '{name}': {reason}")]
    Read { name: String, reason: String },

    /// Writing the output file failed
    #[error("Failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Remote dataset could not be downloaded
    #[error("Remote fetch of '{url}' failed: {reason}")]
    RemoteFetch { url: String, reason: String },

    /// Layout the writer cannot express
    #[error("Unsupported layout: {0}")]
    Unsupported(String),

    /// The file content does not form a consistent dataset
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl NetCdfError {
    /// Create a RemoteFetch error.
    pub fn remote_fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
