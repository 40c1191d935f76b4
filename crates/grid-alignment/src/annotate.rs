//! CF metadata annotation.
//!
//! Turns a bare forcing subset into a georeferenced dataset:
//! - renames the index dimensions to `y`/`x` and the time dimension to `time`
//! - attaches 1-D projected coordinates on `x`/`y`
//! - attaches 2-D `lon`/`lat` auxiliary coordinates
//! - attaches a `spatial_ref` grid-mapping variable carrying the template WKT
//!   and binds every horizontal data variable to it
//!
//! Applying the annotation twice with the same inputs leaves the dataset
//! exactly as after the first application.

use grid_common::{Dataset, Variable};
use projection::LccParams;
use tracing::info;

use crate::config::AlignmentConfig;
use crate::error::{AlignmentError, Result};
use crate::reproject::GeographicMesh;

/// Output name of the column dimension.
pub const X_DIM: &str = "x";
/// Output name of the row dimension.
pub const Y_DIM: &str = "y";
/// Output name of the time dimension.
pub const TIME_DIM: &str = "time";
/// Longitude auxiliary coordinate.
pub const LON_VAR: &str = "lon";
/// Latitude auxiliary coordinate.
pub const LAT_VAR: &str = "lat";
/// Grid-mapping variable.
pub const GRID_MAPPING_VAR: &str = "spatial_ref";
/// Metadata convention stamped on the dataset.
pub const CONVENTIONS: &str = "CF-1.8";

/// Everything derived from the template that annotation attaches.
#[derive(Debug, Clone, Copy)]
pub struct Annotation<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub mesh: &'a GeographicMesh,
    /// WKT copied verbatim from the template
    pub wkt: &'a str,
    /// Projection parameters the coordinates are expressed in
    pub params: &'a LccParams,
}

/// Annotate `dataset` in place.
///
/// All lengths are checked before anything is changed, so a failed call
/// leaves `dataset` untouched.
pub fn annotate(dataset: &mut Dataset, annotation: &Annotation<'_>, config: &AlignmentConfig) -> Result<()> {
    // Source names first, output names when already annotated
    let rows = horizontal_len(dataset, &config.row_dim, Y_DIM)?;
    let cols = horizontal_len(dataset, &config.col_dim, X_DIM)?;
    if annotation.x.len() != cols {
        return Err(AlignmentError::dimension_mismatch(X_DIM, cols, annotation.x.len()));
    }
    if annotation.y.len() != rows {
        return Err(AlignmentError::dimension_mismatch(Y_DIM, rows, annotation.y.len()));
    }
    if annotation.mesh.shape() != (rows, cols)
        || annotation.mesh.lon.len() != rows * cols
        || annotation.mesh.lat.len() != rows * cols
    {
        return Err(AlignmentError::dimension_mismatch(
            "lon/lat",
            rows * cols,
            annotation.mesh.lon.len().min(annotation.mesh.lat.len()),
        ));
    }

    dataset.rename_dimensions(&[
        (config.row_dim.as_str(), Y_DIM),
        (config.col_dim.as_str(), X_DIM),
    ])?;
    // A single-plane subset may have no time axis at all
    if dataset.dimension(&config.time_dim).is_some() {
        dataset.rename_dimensions(&[(config.time_dim.as_str(), TIME_DIM)])?;
    }

    dataset.set_variable(
        Variable::new(X_DIM, &[X_DIM], annotation.x.to_vec())
            .with_attr("axis", "X")
            .with_attr("standard_name", "projection_x_coordinate")
            .with_attr("long_name", "x coordinate of projection")
            .with_attr("units", "m")
            .with_attr("resolution", config.resolution),
    )?;

    dataset.set_variable(
        Variable::new(Y_DIM, &[Y_DIM], annotation.y.to_vec())
            .with_attr("axis", "Y")
            .with_attr("standard_name", "projection_y_coordinate")
            .with_attr("long_name", "y coordinate of projection")
            .with_attr("units", "m")
            .with_attr("resolution", config.resolution),
    )?;

    dataset.set_variable(
        Variable::new(LON_VAR, &[Y_DIM, X_DIM], annotation.mesh.lon.clone())
            .with_attr("standard_name", "longitude")
            .with_attr("long_name", "longitude")
            .with_attr("units", "degrees_east"),
    )?;

    dataset.set_variable(
        Variable::new(LAT_VAR, &[Y_DIM, X_DIM], annotation.mesh.lat.clone())
            .with_attr("standard_name", "latitude")
            .with_attr("long_name", "latitude")
            .with_attr("units", "degrees_north"),
    )?;

    dataset.set_variable(grid_mapping_variable(annotation.wkt, annotation.params))?;

    let reserved = [X_DIM, Y_DIM, LON_VAR, LAT_VAR, GRID_MAPPING_VAR];
    let data_vars: Vec<String> = dataset
        .variables()
        .iter()
        .filter(|v| !reserved.contains(&v.name.as_str()))
        .filter(|v| !v.is_container() && v.ends_with_dims(&[Y_DIM, X_DIM]))
        .map(|v| v.name.clone())
        .collect();

    for name in &data_vars {
        if let Some(var) = dataset.variable_mut(name) {
            var.attributes.set("grid_mapping", GRID_MAPPING_VAR);
            var.attributes.set("coordinates", format!("{} {}", LAT_VAR, LON_VAR));
        }
    }

    dataset.set_attribute("Conventions", CONVENTIONS);

    info!(
        rows,
        cols,
        data_vars = data_vars.len(),
        "Annotated dataset with projected and geographic coordinates"
    );

    Ok(())
}

fn horizontal_len(dataset: &Dataset, source: &str, output: &str) -> Result<usize> {
    match dataset.dimension(source) {
        Some(dim) => Ok(dim.len),
        None => Ok(dataset.dim_len(output)?),
    }
}

/// Scalar grid-mapping variable holding the WKT and the CF
/// `lambert_conformal_conic` parameters.
fn grid_mapping_variable(wkt: &str, params: &LccParams) -> Variable {
    let mut var = Variable::container(GRID_MAPPING_VAR)
        .with_attr("crs_wkt", wkt)
        .with_attr("spatial_ref", wkt)
        .with_attr("grid_mapping_name", "lambert_conformal_conic")
        .with_attr("longitude_of_central_meridian", params.central_meridian)
        .with_attr("latitude_of_projection_origin", params.latitude_of_origin)
        .with_attr("false_easting", params.false_easting)
        .with_attr("false_northing", params.false_northing)
        .with_attr("earth_radius", params.earth_radius)
        .with_attr("x_dim", X_DIM)
        .with_attr("y_dim", Y_DIM);
    var.attributes.set(
        "standard_parallel",
        grid_common::AttrValue::Doubles(vec![params.standard_parallel_1, params.standard_parallel_2]),
    );
    var
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::{AttrValue, Dimension};

    fn bare_subset() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_dimension(Dimension::unlimited("Time", 1));
        ds.add_dimension(Dimension::new("south_north", 2));
        ds.add_dimension(Dimension::new("west_east", 3));
        ds.set_variable(Variable::new(
            "LWDOWN",
            &["Time", "south_north", "west_east"],
            vec![1.0; 6],
        ))
        .unwrap();
        ds.set_variable(Variable::new("Times", &["Time"], vec![0.0]))
            .unwrap();
        ds
    }

    fn mesh() -> GeographicMesh {
        GeographicMesh {
            lon: vec![-100.0, -99.0, -98.0, -100.0, -99.0, -98.0],
            lat: vec![40.0, 40.0, 40.0, 41.0, 41.0, 41.0],
            rows: 2,
            cols: 3,
        }
    }

    #[test]
    fn test_annotate_adds_coordinates() {
        let mut ds = bare_subset();
        let mesh = mesh();
        let params = LccParams::nwm_conus();
        let annotation = Annotation {
            x: &[0.0, 1000.0, 2000.0],
            y: &[0.0, 1000.0],
            mesh: &mesh,
            wkt: "PROJCS[\"Lambert_Conformal_Conic\"]",
            params: &params,
        };

        annotate(&mut ds, &annotation, &AlignmentConfig::default()).unwrap();

        assert_eq!(ds.dim_len("x").unwrap(), 3);
        assert_eq!(ds.dim_len("y").unwrap(), 2);
        assert!(ds.dimension("time").is_some());

        let x = ds.variable("x").unwrap();
        assert_eq!(x.attributes.get_str("axis"), Some("X"));
        assert_eq!(x.attributes.get("resolution"), Some(&AttrValue::Double(1000.0)));

        let lat = ds.variable("lat").unwrap();
        assert_eq!(lat.dims, vec!["y", "x"]);
        assert_eq!(lat.attributes.get_str("units"), Some("degrees_north"));

        let crs = ds.variable("spatial_ref").unwrap();
        assert_eq!(crs.attributes.get_str("crs_wkt"), Some("PROJCS[\"Lambert_Conformal_Conic\"]"));

        let field = ds.variable("LWDOWN").unwrap();
        assert_eq!(field.dims, vec!["time", "y", "x"]);
        assert_eq!(field.attributes.get_str("grid_mapping"), Some("spatial_ref"));
        assert_eq!(field.attributes.get_str("coordinates"), Some("lat lon"));

        // 1-D time variable is not a horizontal field
        assert!(ds.variable("Times").unwrap().attributes.get("grid_mapping").is_none());
        assert_eq!(ds.attribute("Conventions").and_then(AttrValue::as_str), Some("CF-1.8"));
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let mesh = mesh();
        let params = LccParams::nwm_conus();
        let annotation = Annotation {
            x: &[0.0, 1000.0, 2000.0],
            y: &[0.0, 1000.0],
            mesh: &mesh,
            wkt: "PROJCS[\"Lambert_Conformal_Conic\"]",
            params: &params,
        };
        let config = AlignmentConfig::default();

        let mut once = bare_subset();
        annotate(&mut once, &annotation, &config).unwrap();
        let mut twice = once.clone();
        annotate(&mut twice, &annotation, &config).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_annotate_rejects_wrong_lengths() {
        let mut ds = bare_subset();
        let mesh = mesh();
        let params = LccParams::nwm_conus();
        let annotation = Annotation {
            x: &[0.0, 1000.0],
            y: &[0.0, 1000.0],
            mesh: &mesh,
            wkt: "",
            params: &params,
        };

        let err = annotate(&mut ds, &annotation, &AlignmentConfig::default()).unwrap_err();
        assert_eq!(err, AlignmentError::dimension_mismatch("x", 3, 2));
    }

    #[test]
    fn test_failed_annotate_leaves_dataset_untouched() {
        let mesh = mesh();
        let params = LccParams::nwm_conus();
        let config = AlignmentConfig::default();
        let before = bare_subset();

        for (x, y) in [
            (&[0.0, 1000.0][..], &[0.0, 1000.0][..]),
            (&[0.0, 1000.0, 2000.0][..], &[0.0][..]),
        ] {
            let annotation = Annotation {
                x,
                y,
                mesh: &mesh,
                wkt: "",
                params: &params,
            };
            let mut ds = before.clone();
            assert!(annotate(&mut ds, &annotation, &config).is_err());
            assert_eq!(ds, before);
        }

        // Mesh of the wrong shape
        let small = GeographicMesh {
            lon: vec![-100.0; 2],
            lat: vec![40.0; 2],
            rows: 1,
            cols: 2,
        };
        let annotation = Annotation {
            x: &[0.0, 1000.0, 2000.0],
            y: &[0.0, 1000.0],
            mesh: &small,
            wkt: "",
            params: &params,
        };
        let mut ds = before.clone();
        let err = annotate(&mut ds, &annotation, &config).unwrap_err();
        assert_eq!(err, AlignmentError::dimension_mismatch("lon/lat", 6, 2));
        assert_eq!(ds, before);
    }

    #[test]
    fn test_missing_row_dimension_leaves_dataset_untouched() {
        let mut before = Dataset::new();
        before.add_dimension(Dimension::new("west_east", 3));
        let mesh = mesh();
        let params = LccParams::nwm_conus();
        let annotation = Annotation {
            x: &[0.0, 1000.0, 2000.0],
            y: &[0.0, 1000.0],
            mesh: &mesh,
            wkt: "",
            params: &params,
        };

        let mut ds = before.clone();
        let err = annotate(&mut ds, &annotation, &AlignmentConfig::default()).unwrap_err();
        assert!(matches!(err, AlignmentError::Dataset(_)));
        assert_eq!(ds, before);
    }
}
