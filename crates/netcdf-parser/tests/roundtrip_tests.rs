//! Write/read round trips through real NetCDF-4 files.

use grid_common::AttrValue;
use netcdf_parser::{load_dataset_from_bytes, open_dataset, write_dataset, ReadOptions};
use test_utils::fixtures::lcc;
use test_utils::{history_with_offsets, require_test_file, synthetic_target, synthetic_template, temp_test_dir};

#[test]
fn test_target_round_trip() {
    let dir = temp_test_dir();
    let path = dir.path().join("subset.nc");
    let history = history_with_offsets((10, 12), (20, 23));
    let target = synthetic_target(4, 3, 2, Some(&history));

    write_dataset(&target, &path).unwrap();
    let read = open_dataset(path.to_str().unwrap(), &ReadOptions::all()).unwrap();

    assert_eq!(read.dim_len("Time").unwrap(), 2);
    assert!(read.dimension("Time").unwrap().unlimited);
    assert_eq!(read.dim_len("south_north").unwrap(), 4);
    assert_eq!(read.dim_len("west_east").unwrap(), 3);
    assert_eq!(
        read.attribute("history").and_then(AttrValue::as_str),
        Some(history.as_str())
    );

    let lwdown = read.variable("LWDOWN").unwrap();
    assert_eq!(lwdown.dims, vec!["Time", "south_north", "west_east"]);
    assert_eq!(lwdown.data, target.variable("LWDOWN").unwrap().data);
    assert_eq!(read.variable("Time").unwrap().data, vec![0.0, 1.0]);
}

#[test]
fn test_template_selected_variables() {
    let dir = temp_test_dir();
    let path = dir.path().join("template.nc");
    let mut template = synthetic_template(30, 20, lcc::NWM_WKT);
    template
        .set_variable(grid_common::Variable::new(
            "topography",
            &["y", "x"],
            vec![0.0; 600],
        ))
        .unwrap();

    write_dataset(&template, &path).unwrap();
    let read = open_dataset(
        path.to_str().unwrap(),
        &ReadOptions::only(["x", "y", "crs"]),
    )
    .unwrap();

    assert!(read.variable("topography").is_none());
    assert_eq!(read.variable("x").unwrap().data, template.variable("x").unwrap().data);
    assert_eq!(
        read.variable("crs").unwrap().attributes.get_str("esri_pe_string"),
        Some(lcc::NWM_WKT)
    );
}

#[test]
fn test_load_from_bytes_matches_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("subset.nc");
    let target = synthetic_target(2, 2, 1, Some("west_east,0,1 south_north,0,1"));
    write_dataset(&target, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let from_bytes = load_dataset_from_bytes(&bytes, &ReadOptions::all()).unwrap();
    let from_file = open_dataset(path.to_str().unwrap(), &ReadOptions::all()).unwrap();

    assert_eq!(from_bytes, from_file);
}

#[test]
fn test_fill_values_survive_round_trip() {
    let dir = temp_test_dir();
    let path = dir.path().join("gaps.nc");
    let mut target = synthetic_target(2, 2, 1, None);
    target.variable_mut("RAINRATE").unwrap().data[1] = f64::NAN;

    write_dataset(&target, &path).unwrap();
    let read = open_dataset(path.to_str().unwrap(), &ReadOptions::all()).unwrap();

    let rain = &read.variable("RAINRATE").unwrap().data;
    assert!(rain[1].is_nan());
    assert_eq!(rain[0], target.variable("RAINRATE").unwrap().data[0]);
}

#[test]
fn test_missing_file() {
    assert!(open_dataset("/nonexistent/dir/subset.nc", &ReadOptions::all()).is_err());
}

#[test]
fn test_real_template_has_projected_axes() {
    let path = require_test_file!("WRF_Hydro_NWM_geospatial_data_template_land_GIS.nc");
    let template = open_dataset(path.to_str().unwrap(), &ReadOptions::only(["x", "y", "crs"])).unwrap();

    assert_eq!(template.dim_len("x").unwrap(), test_utils::fixtures::grid::CONUS_WIDTH);
    assert_eq!(template.dim_len("y").unwrap(), test_utils::fixtures::grid::CONUS_HEIGHT);
    assert!(template.variable("crs").unwrap().attributes.contains("esri_pe_string"));
}
