//! Configuration for the alignment pipeline.

use projection::LccParams;
use serde::{Deserialize, Serialize};

/// Configuration for aligning a forcing subset with the spatial template.
///
/// Defaults describe AORC forcing subsets of the NWM 1 km CONUS grid and the
/// NWM spatial metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Row-index dimension of the target dataset.
    pub row_dim: String,

    /// Column-index dimension of the target dataset.
    pub col_dim: String,

    /// Time dimension of the target dataset.
    pub time_dim: String,

    /// Axis token preceding the row offsets in the provenance string.
    pub row_token: String,

    /// Axis token preceding the column offsets in the provenance string.
    pub col_token: String,

    /// Global attribute holding the free-text provenance.
    pub provenance_attribute: String,

    /// Global attribute holding the structured row offset pair.
    pub row_offset_attribute: String,

    /// Global attribute holding the structured column offset pair.
    pub col_offset_attribute: String,

    /// Template variable with projected x coordinates.
    pub template_x_var: String,

    /// Template variable with projected y coordinates.
    pub template_y_var: String,

    /// Template variable carrying the CRS attributes.
    pub crs_variable: String,

    /// Attributes searched, in order, for the WKT string.
    pub wkt_attributes: Vec<String>,

    /// Nominal cell size in projection units.
    pub resolution: f64,

    /// Lambert Conformal Conic parameters used for reprojection.
    pub projection: LccParams,

    /// Derive projection parameters from the template WKT instead of `projection`.
    pub projection_from_wkt: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            row_dim: "south_north".to_string(),
            col_dim: "west_east".to_string(),
            time_dim: "Time".to_string(),
            row_token: "south_north".to_string(),
            col_token: "west_east".to_string(),
            provenance_attribute: "history".to_string(),
            row_offset_attribute: "subset_south_north".to_string(),
            col_offset_attribute: "subset_west_east".to_string(),
            template_x_var: "x".to_string(),
            template_y_var: "y".to_string(),
            crs_variable: "crs".to_string(),
            wkt_attributes: vec![
                "esri_pe_string".to_string(),
                "spatial_ref".to_string(),
                "crs_wkt".to_string(),
            ],
            resolution: 1000.0,
            projection: LccParams::nwm_conus(),
            projection_from_wkt: false,
        }
    }
}

impl AlignmentConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `GEOREF_*` environment variables on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("GEOREF_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                self.resolution = resolution;
            }
        }

        if let Ok(val) = std::env::var("GEOREF_COL_TOKEN") {
            self.col_token = val;
        }

        if let Ok(val) = std::env::var("GEOREF_ROW_TOKEN") {
            self.row_token = val;
        }

        if let Ok(val) = std::env::var("GEOREF_PROJECTION_FROM_WKT") {
            self.projection_from_wkt = val.to_lowercase() == "true" || val == "1";
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err("resolution must be > 0".to_string());
        }

        for (name, value) in [
            ("row_dim", &self.row_dim),
            ("col_dim", &self.col_dim),
            ("time_dim", &self.time_dim),
            ("row_token", &self.row_token),
            ("col_token", &self.col_token),
            ("provenance_attribute", &self.provenance_attribute),
            ("template_x_var", &self.template_x_var),
            ("template_y_var", &self.template_y_var),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
        }

        if self.row_dim == self.col_dim {
            return Err("row_dim and col_dim must differ".to_string());
        }

        if self.wkt_attributes.is_empty() {
            return Err("wkt_attributes must name at least one attribute".to_string());
        }

        Ok(())
    }
}
