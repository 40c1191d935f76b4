//! Common test fixtures for georeferencing tests.
//!
//! This module provides pre-defined values that describe the NWM 1 km CONUS
//! grid and the AORC subsets cut from it.

/// NWM CONUS Lambert Conformal Conic parameters.
pub mod lcc {
    pub const STANDARD_PARALLEL_1: f64 = 30.0;
    pub const STANDARD_PARALLEL_2: f64 = 60.0;
    pub const LATITUDE_OF_ORIGIN: f64 = 40.0;
    pub const CENTRAL_MERIDIAN: f64 = -97.0;
    /// Sphere radius used by WRF-Hydro
    pub const EARTH_RADIUS: f64 = 6_370_000.0;

    /// `esri_pe_string` carried by the template's `crs` variable
    pub const NWM_WKT: &str = r#"PROJCS["Lambert_Conformal_Conic",GEOGCS["GCS_Sphere",DATUM["D_Sphere",SPHEROID["Sphere",6370000.0,0.0]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic"],PARAMETER["false_easting",0.0],PARAMETER["false_northing",0.0],PARAMETER["central_meridian",-97.0],PARAMETER["standard_parallel_1",30.0],PARAMETER["standard_parallel_2",60.0],PARAMETER["latitude_of_origin",40.0],UNIT["Meter",1.0]]"#;
}

/// NWM 1 km CONUS grid geometry.
pub mod grid {
    /// Columns in the full CONUS grid
    pub const CONUS_WIDTH: usize = 4608;
    /// Rows in the full CONUS grid
    pub const CONUS_HEIGHT: usize = 3840;
    /// Grid spacing in metres
    pub const RESOLUTION: f64 = 1000.0;
    /// Projected x of the first column centre
    pub const X0: f64 = -2_303_999.25;
    /// Projected y of the first row centre
    pub const Y0: f64 = -1_919_999.75;
}

/// Provenance strings as found in AORC subset files.
pub mod history {
    /// Both axes present, as written by `ncks`
    pub const SAMPLE: &str = "Tue Mar  5 18:01:02 2024: ncks -O -d west_east,3500,3699 \
        -d south_north,1900,2099 AORC-OWP_2012063021z.nc4 subset.nc";

    /// Row axis missing
    pub const MISSING_ROW: &str = "Tue Mar  5 18:01:02 2024: ncks -O -d west_east,3500,3699 \
        AORC-OWP_2012063021z.nc4 subset.nc";

    /// Column window with start after end
    pub const REVERSED_COLUMN: &str = "ncks -O -d west_east,3699,3500 \
        -d south_north,1900,2099 in.nc out.nc";
}

/// Forcing variables carried by AORC files.
pub mod fields {
    pub const LWDOWN: &str = "LWDOWN";
    pub const PSFC: &str = "PSFC";
    pub const RAINRATE: &str = "RAINRATE";
    pub const T2D: &str = "T2D";

    pub const ALL: [&str; 4] = [LWDOWN, PSFC, RAINRATE, T2D];
}
