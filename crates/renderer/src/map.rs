//! Sample map of one field on its geographic grid.
//!
//! The forcing grid is curvilinear in longitude/latitude, so cells are not
//! axis-aligned on a lon/lat raster. Each output pixel takes the value of the
//! nearest grid node (in pixel space) within roughly one cell spacing, and
//! pixels farther than that from every node stay transparent.

use grid_common::{BoundingBox, Dataset};
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::gradient::{finite_range, render_grid, ColorRamp};
use crate::png::create_png_auto;

/// Options for [`render_field_map`].
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Length of the longer image side in pixels
    pub max_size: usize,
    /// Name of the 2-D longitude variable
    pub lon_var: String,
    /// Name of the 2-D latitude variable
    pub lat_var: String,
    /// Ramp override; picked from the field name when `None`
    pub ramp: Option<ColorRamp>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            max_size: 800,
            lon_var: "lon".to_string(),
            lat_var: "lat".to_string(),
            ramp: None,
        }
    }
}

/// A rendered field map.
#[derive(Debug, Clone)]
pub struct FieldMap {
    /// Encoded PNG
    pub png: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Geographic extent covered by the image (lon as x, lat as y)
    pub bounds: BoundingBox,
    /// Value range mapped onto the colour ramp
    pub value_range: (f64, f64),
}

/// Draw `field` at `time_index` of an annotated dataset as a PNG.
pub fn render_field_map(
    dataset: &Dataset,
    field: &str,
    time_index: usize,
    options: &MapOptions,
) -> RenderResult<FieldMap> {
    let (values, rows, cols) = dataset.time_slice(field, time_index)?;
    let lon = &dataset.require_variable(&options.lon_var)?.data;
    let lat = &dataset.require_variable(&options.lat_var)?.data;

    let value_range =
        finite_range(&values).ok_or_else(|| RenderError::NoFiniteValues(field.to_string()))?;
    let ramp = options
        .ramp
        .clone()
        .unwrap_or_else(|| ColorRamp::for_field(field));

    let raster = rasterize_nearest(&values, lon, lat, rows, cols, options.max_size)?;
    let pixels = render_grid(
        &raster.values,
        raster.width,
        raster.height,
        value_range.0,
        value_range.1,
        &ramp,
    );
    let png = create_png_auto(&pixels, raster.width, raster.height)?;

    info!(
        field,
        time_index,
        width = raster.width,
        height = raster.height,
        min = value_range.0,
        max = value_range.1,
        "Rendered field map"
    );

    Ok(FieldMap {
        png,
        width: raster.width,
        height: raster.height,
        bounds: raster.bounds,
        value_range,
    })
}

/// A north-up lon/lat raster of resampled values (NaN where empty).
#[derive(Debug, Clone)]
pub struct Raster {
    pub values: Vec<f64>,
    pub width: usize,
    pub height: usize,
    pub bounds: BoundingBox,
}

/// Resample a curvilinear grid onto a regular lon/lat raster.
///
/// `values`, `lon` and `lat` are row-major `(rows, cols)` arrays.
pub fn rasterize_nearest(
    values: &[f64],
    lon: &[f64],
    lat: &[f64],
    rows: usize,
    cols: usize,
    max_size: usize,
) -> RenderResult<Raster> {
    let n = rows * cols;
    for len in [lon.len(), lat.len()] {
        if len != n || values.len() != n {
            return Err(RenderError::ShapeMismatch {
                expected: values.len(),
                actual: len,
            });
        }
    }
    if max_size == 0 || n == 0 {
        return Err(RenderError::InvalidSize {
            width: max_size,
            height: n,
        });
    }

    let bounds = BoundingBox::enclosing(lon, lat).ok_or(RenderError::ShapeMismatch {
        expected: n,
        actual: 0,
    })?;
    // Give degenerate extents (single row/column) some size
    let lon_span = bounds.width().max(1e-6);
    let lat_span = bounds.height().max(1e-6);

    let (width, height) = if lon_span >= lat_span {
        let h = (max_size as f64 * lat_span / lon_span).round() as usize;
        (max_size, h.max(1))
    } else {
        let w = (max_size as f64 * lon_span / lat_span).round() as usize;
        (w.max(1), max_size)
    };
    let px_per_lon = width as f64 / lon_span;
    let px_per_lat = height as f64 / lat_span;

    // Search radius: a little over half a cell diagonal
    let spacing = (width as f64 / cols.saturating_sub(1).max(1) as f64)
        .max(height as f64 / rows.saturating_sub(1).max(1) as f64);
    let radius = (spacing * 0.75).ceil() as i64 + 1;

    let mut best = vec![f64::INFINITY; width * height];
    let mut out = vec![f64::NAN; width * height];

    for idx in 0..n {
        if !lon[idx].is_finite() || !lat[idx].is_finite() {
            continue;
        }
        // Pixel-space position, row 0 at the northern edge
        let fx = (lon[idx] - bounds.min_x) * px_per_lon;
        let fy = (bounds.max_y - lat[idx]) * px_per_lat;
        let cx = fx.floor() as i64;
        let cy = fy.floor() as i64;

        for py in (cy - radius).max(0)..=(cy + radius).min(height as i64 - 1) {
            for px in (cx - radius).max(0)..=(cx + radius).min(width as i64 - 1) {
                let dx = px as f64 + 0.5 - fx;
                let dy = py as f64 + 0.5 - fy;
                let d2 = dx * dx + dy * dy;
                if d2 > (spacing * 0.75 + 0.5).powi(2) {
                    continue;
                }
                let p = py as usize * width + px as usize;
                if d2 < best[p] {
                    best[p] = d2;
                    out[p] = values[idx];
                }
            }
        }
    }

    debug!(width, height, radius, "Rasterized curvilinear grid");

    Ok(Raster {
        values: out,
        width,
        height,
        bounds,
    })
}
