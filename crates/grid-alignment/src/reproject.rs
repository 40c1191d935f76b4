//! Reprojection of sliced projected coordinates to geographic coordinates.
//!
//! The sliced 1-D x/y arrays describe a rectilinear grid in Lambert
//! Conformal Conic metres. Meshing them and inverting the projection at every
//! node gives curvilinear 2-D longitude/latitude arrays aligned
//! index-for-index with the target (row, column) axes.

use grid_common::BoundingBox;
use projection::LambertConformal;
use tracing::debug;

use crate::error::Result;

/// 2-D longitude/latitude arrays in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicMesh {
    /// Longitude in degrees east, `rows * cols` values
    pub lon: Vec<f64>,
    /// Latitude in degrees north, `rows * cols` values
    pub lat: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl GeographicMesh {
    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Longitude/latitude of a single node.
    pub fn at(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let idx = row * self.cols + col;
        Some((self.lon[idx], self.lat[idx]))
    }

    /// Geographic bounding box of all nodes.
    ///
    /// The edges of a Lambert grid are curved in geographic space, so this
    /// is the box enclosing every node rather than the corner box.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.lon, &self.lat)
    }
}

/// Mesh `x` (columns) and `y` (rows) and inverse-project every node.
///
/// # Arguments
/// * `proj` - Projection the coordinates are expressed in
/// * `x` - Projected x per column (metres)
/// * `y` - Projected y per row (metres)
///
/// # Returns
/// A mesh of shape `(y.len(), x.len())`.
pub fn mesh_to_geographic(proj: &LambertConformal, x: &[f64], y: &[f64]) -> Result<GeographicMesh> {
    let rows = y.len();
    let cols = x.len();

    let mut lon = Vec::with_capacity(rows * cols);
    let mut lat = Vec::with_capacity(rows * cols);

    for &yv in y {
        for &xv in x {
            let (lo, la) = proj.inverse(xv, yv)?;
            lon.push(lo);
            lat.push(la);
        }
    }

    debug!(rows, cols, "Reprojected coordinate mesh to geographic");

    Ok(GeographicMesh { lon, lat, rows, cols })
}
