//! Image rendering for georeferenced forcing fields.
//!
//! - [`gradient`]: colour ramps and value-to-pixel mapping
//! - [`png`]: PNG encoding (indexed when the palette allows, RGBA otherwise)
//! - [`map`]: one field at one time step drawn on a north-up lon/lat raster

pub mod error;
pub mod gradient;
pub mod map;
pub mod png;

pub use error::{RenderError, RenderResult};
pub use gradient::{Color, ColorRamp};
pub use map::{render_field_map, FieldMap, MapOptions};
