//! Lambert Conformal Conic behaviour on the NWM CONUS grid.

use projection::{LambertConformal, LccParams};
use test_utils::fixtures::{grid, lcc};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

fn nwm() -> LambertConformal {
    LambertConformal::new(LccParams::nwm_conus()).unwrap()
}

#[test]
fn test_fixture_params_match_nwm_conus() {
    let params = LccParams::nwm_conus();
    assert_eq!(params.standard_parallel_1, lcc::STANDARD_PARALLEL_1);
    assert_eq!(params.standard_parallel_2, lcc::STANDARD_PARALLEL_2);
    assert_eq!(params.latitude_of_origin, lcc::LATITUDE_OF_ORIGIN);
    assert_eq!(params.central_meridian, lcc::CENTRAL_MERIDIAN);
    assert_eq!(params.earth_radius, lcc::EARTH_RADIUS);
}

#[test]
fn test_wkt_fixture_parses_to_nwm_conus() {
    assert_eq!(LccParams::from_wkt(lcc::NWM_WKT).unwrap(), LccParams::nwm_conus());
}

#[test]
fn test_round_trip_across_conus() {
    let proj = nwm();
    for &(lon, lat) in &[
        (-124.7, 48.4),
        (-67.0, 44.8),
        (-80.2, 25.8),
        (-117.1, 32.7),
        (-97.0, 40.0),
        (-105.0, 39.7),
    ] {
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_coords_approx_eq!((lon2, lat2), (lon, lat), 1e-6);
    }
}

#[test]
fn test_grid_corner_is_southwest_conus() {
    // The first cell centre of the 1 km grid lies off the Baja California coast
    let (lon, lat) = nwm().inverse(grid::X0, grid::Y0).unwrap();
    assert!(lon > -125.0 && lon < -115.0, "lon {}", lon);
    assert!(lat > 18.0 && lat < 25.0, "lat {}", lat);
}

#[test]
fn test_grid_is_roughly_symmetric_about_central_meridian() {
    let proj = nwm();
    let half_width = grid::CONUS_WIDTH as f64 * grid::RESOLUTION / 2.0;
    let (west, _) = proj.inverse(-half_width, 0.0).unwrap();
    let (east, _) = proj.inverse(half_width, 0.0).unwrap();
    assert_approx_eq!(west + east, 2.0 * lcc::CENTRAL_MERIDIAN, 1e-9);
}
