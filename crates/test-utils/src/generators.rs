//! Synthetic dataset generators.
//!
//! These build small in-memory forcing subsets and templates with
//! predictable values so alignment results can be checked by hand.

use grid_common::{Dataset, Dimension, Variable};

use crate::fixtures::{fields, grid};

/// Creates a provenance string recording the given inclusive windows.
///
/// # Example
///
/// ```
/// use test_utils::history_with_offsets;
///
/// let history = history_with_offsets((10, 12), (20, 23));
/// assert!(history.contains("west_east,10,12"));
/// assert!(history.contains("south_north,20,23"));
/// ```
pub fn history_with_offsets(col: (usize, usize), row: (usize, usize)) -> String {
    format!(
        "Fri Jun 14 09:12:44 2024: ncks -O -d west_east,{},{} -d south_north,{},{} \
         AORC-OWP_2012063021z.nc4 subset.nc",
        col.0, col.1, row.0, row.1
    )
}

/// Value stored at `(time, row, col)` of every synthetic forcing field.
///
/// `time * 1_000_000 + row * 1000 + col`, so a cell can be identified from
/// its value alone.
pub fn forcing_value(time: usize, row: usize, col: usize) -> f64 {
    (time * 1_000_000 + row * 1000 + col) as f64
}

/// Creates an AORC-like forcing subset.
///
/// Dimensions are `Time` (unlimited), `south_north` and `west_east`. Every
/// field in [`fields::ALL`] is filled using [`forcing_value`]. A `Time`
/// coordinate holds hours since the first step.
///
/// # Arguments
///
/// * `rows` - Length of `south_north`
/// * `cols` - Length of `west_east`
/// * `times` - Length of `Time`
/// * `history` - Provenance attribute, omitted when `None`
pub fn synthetic_target(rows: usize, cols: usize, times: usize, history: Option<&str>) -> Dataset {
    let mut ds = Dataset::new();
    ds.add_dimension(Dimension::unlimited("Time", times));
    ds.add_dimension(Dimension::new("south_north", rows));
    ds.add_dimension(Dimension::new("west_east", cols));

    let hours = (0..times).map(|t| t as f64).collect();
    ds.set_variable(
        Variable::new("Time", &["Time"], hours).with_attr("units", "hours since 2012-06-30 21:00:00"),
    )
    .expect("time coordinate matches its dimension");

    let mut data = Vec::with_capacity(times * rows * cols);
    for t in 0..times {
        for r in 0..rows {
            for c in 0..cols {
                data.push(forcing_value(t, r, c));
            }
        }
    }

    for name in fields::ALL {
        ds.set_variable(
            Variable::new(name, &["Time", "south_north", "west_east"], data.clone())
                .with_attr("long_name", name)
                .with_attr("_FillValue", -9999.0),
        )
        .expect("field matches its dimensions");
    }

    if let Some(history) = history {
        ds.set_attribute("history", history);
    }
    ds
}

/// Projected x of template column `col`.
pub fn template_x(col: usize) -> f64 {
    grid::X0 + col as f64 * grid::RESOLUTION
}

/// Projected y of template row `row`.
pub fn template_y(row: usize) -> f64 {
    grid::Y0 + row as f64 * grid::RESOLUTION
}

/// Creates an NWM-like spatial metadata template.
///
/// Carries 1-D `x`/`y` coordinates spaced at 1 km from the CONUS grid
/// origin and a `crs` container variable whose `esri_pe_string` is `wkt`.
pub fn synthetic_template(rows: usize, cols: usize, wkt: &str) -> Dataset {
    let mut ds = Dataset::new();
    ds.add_dimension(Dimension::new("y", rows));
    ds.add_dimension(Dimension::new("x", cols));

    ds.set_variable(
        Variable::new("x", &["x"], (0..cols).map(template_x).collect())
            .with_attr("standard_name", "projection_x_coordinate")
            .with_attr("units", "m"),
    )
    .expect("x matches its dimension");
    ds.set_variable(
        Variable::new("y", &["y"], (0..rows).map(template_y).collect())
            .with_attr("standard_name", "projection_y_coordinate")
            .with_attr("units", "m"),
    )
    .expect("y matches its dimension");
    ds.set_variable(
        Variable::container("crs")
            .with_attr("esri_pe_string", wkt)
            .with_attr("grid_mapping_name", "lambert_conformal_conic"),
    )
    .expect("crs has no dimensions");

    ds
}
