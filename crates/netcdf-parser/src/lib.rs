//! NetCDF I/O for AORC forcing subsets and the NWM spatial metadata template.
//!
//! This crate converts between NetCDF-4 files and the in-memory
//! [`grid_common::Dataset`] model:
//! - [`open_dataset`] reads a local path or an OPeNDAP URL
//! - [`load_dataset_from_bytes`] reads a file that was downloaded into memory
//! - [`write_dataset`] dumps a dataset back to NetCDF-4
//!
//! # Implementation Notes
//!
//! Every numeric variable is read as `f64`. Packed variables
//! (`scale_factor`/`add_offset`) are unpacked on read and fill values become
//! NaN. Variables libnetcdf cannot convert to `f64` (character arrays such
//! as WRF `Times`) and scalar variables (grid mappings such as `crs`) are
//! kept as attribute-only variables.

pub mod error;
pub mod native;
pub mod reader;
pub mod source;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_dataset_from_bytes, silence_hdf5_errors};
pub use reader::{open_dataset, ReadOptions, VariableSelection};
pub use source::DatasetSource;
pub use writer::write_dataset;
