//! Lambert Conformal Conic parameters from a WKT CRS description.
//!
//! Handles the ESRI flavour stored in NWM spatial metadata files
//! (`esri_pe_string`) as well as OGC WKT1 strings that use the same
//! parameter names. Only spherical Lambert Conformal Conic definitions are
//! accepted.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{ProjectionError, ProjectionResult};
use crate::lambert::LccParams;

fn parameter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)PARAMETER\[\s*"([^"]+)"\s*,\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*\]"#)
            .expect("static regex")
    })
}

fn spheroid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:SPHEROID|ELLIPSOID)\[\s*"[^"]*"\s*,\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*,\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)"#)
            .expect("static regex")
    })
}

impl LccParams {
    /// Extract projection parameters from a WKT string.
    pub fn from_wkt(wkt: &str) -> ProjectionResult<Self> {
        if !wkt.to_ascii_lowercase().contains("lambert_conformal_conic") {
            let head: String = wkt.chars().take(60).collect();
            return Err(ProjectionError::Unsupported(head));
        }

        let lookup = |name: &str| -> ProjectionResult<f64> {
            parameter_regex()
                .captures_iter(wkt)
                .find(|caps| caps[1].eq_ignore_ascii_case(name))
                .and_then(|caps| caps[2].parse::<f64>().ok())
                .ok_or_else(|| ProjectionError::MissingParameter(name.to_string()))
        };
        let optional = |name: &str| lookup(name).unwrap_or(0.0);

        let caps = spheroid_regex()
            .captures(wkt)
            .ok_or_else(|| ProjectionError::MissingParameter("SPHEROID".to_string()))?;
        let semi_major: f64 = caps[1]
            .parse()
            .map_err(|_| ProjectionError::MissingParameter("SPHEROID semi-major axis".to_string()))?;
        let inverse_flattening: f64 = caps[2].parse().unwrap_or(0.0);
        if inverse_flattening != 0.0 {
            return Err(ProjectionError::Unsupported(format!(
                "ellipsoidal earth (inverse flattening {})",
                inverse_flattening
            )));
        }

        let standard_parallel_1 = lookup("standard_parallel_1")?;
        // Single-parallel definitions repeat the first parallel
        let standard_parallel_2 = lookup("standard_parallel_2").unwrap_or(standard_parallel_1);

        let params = Self {
            standard_parallel_1,
            standard_parallel_2,
            latitude_of_origin: lookup("latitude_of_origin")?,
            central_meridian: lookup("central_meridian")?,
            earth_radius: semi_major,
            false_easting: optional("false_easting"),
            false_northing: optional("false_northing"),
        };

        debug!(?params, "Parsed Lambert Conformal Conic parameters from WKT");
        Ok(params)
    }
}
