//! Common types shared by every crate in the georeferencing workspace.
//!
//! The central type is [`Dataset`], a small in-memory model of a NetCDF-like
//! collection of named dimensions, variables and attributes. Readers in
//! `netcdf-parser` produce it, `grid-alignment` annotates it and the
//! `renderer` consumes it.

pub mod attributes;
pub mod bbox;
pub mod dataset;
pub mod error;

pub use attributes::{AttrValue, Attributes};
pub use bbox::BoundingBox;
pub use dataset::{Dataset, Dimension, Variable};
pub use error::{DatasetError, DatasetResult};
