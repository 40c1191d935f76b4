//! Coordinate reference system transformations.
//!
//! Implements the spherical Lambert Conformal Conic projection used by the
//! National Water Model grid, without external projection libraries.

pub mod error;
pub mod lambert;
pub mod wkt;

pub use error::{ProjectionError, ProjectionResult};
pub use lambert::{LambertConformal, LccParams};
