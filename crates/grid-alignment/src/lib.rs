//! Spatial alignment and annotation of AORC forcing subsets.
//!
//! AORC forcing files are regional cuts of the National Water Model 1 km
//! CONUS grid. They carry no coordinate values, only the offsets used to cut
//! them, recorded in a provenance attribute. This crate recovers those
//! offsets, slices the template's projected coordinates to the subset,
//! reprojects them to longitude/latitude and stamps CF metadata onto the
//! forcing dataset.
//!
//! # Architecture
//!
//! ```text
//! target dataset ──► offsets::resolve_offsets ──► SubsetOffsets
//!                                                     │
//! template x/y ──────► slicing::slice_reference ◄─────┘
//!                              │
//!                              ▼
//!                 reproject::mesh_to_geographic ──► GeographicMesh
//!                              │
//!                              ▼
//!                 annotate::annotate (copy of target)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_alignment::{align_and_annotate, AlignmentConfig};
//!
//! let aligned = align_and_annotate(&target, &template, &AlignmentConfig::default())?;
//! assert_eq!(aligned.grid.mesh.rows, target.dim_len("south_north")?);
//! ```

pub mod annotate;
pub mod config;
pub mod error;
pub mod offsets;
pub mod pipeline;
pub mod reproject;
pub mod slicing;

pub use annotate::{annotate, Annotation};
pub use config::AlignmentConfig;
pub use error::{AlignmentError, Result};
pub use offsets::{extract_offsets, resolve_offsets, OffsetPair, OffsetSource, SubsetOffsets};
pub use pipeline::{align, align_and_annotate, AlignedDataset, AlignedGrid};
pub use reproject::{mesh_to_geographic, GeographicMesh};
pub use slicing::{flipped_row_window, slice_reference, SlicedCoordinates};
