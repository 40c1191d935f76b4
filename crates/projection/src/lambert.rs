//! Lambert Conformal Conic projection.
//!
//! This projection is used by the National Water Model / WRF-Hydro 1 km
//! CONUS grid on which AORC forcing subsets are cut. It maps a cone secant
//! to a spherical Earth onto a flat plane.
//!
//! The projection parameters include:
//! - Standard parallels (lat_1, lat_2): equal values give a tangent cone
//! - Latitude of origin (lat_0) and central meridian (lon_0)
//! - Earth radius: the NWM grid uses a 6 370 000 m sphere
//! - False easting/northing added to projected coordinates
//!
//! Projected coordinates are metres; geographic coordinates are degrees.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{ProjectionError, ProjectionResult};

/// Lambert Conformal Conic parameters in degrees and metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LccParams {
    /// First standard parallel (degrees)
    pub standard_parallel_1: f64,
    /// Second standard parallel (degrees)
    pub standard_parallel_2: f64,
    /// Latitude of the projection origin (degrees)
    pub latitude_of_origin: f64,
    /// Central meridian (degrees)
    pub central_meridian: f64,
    /// Sphere radius (metres)
    pub earth_radius: f64,
    #[serde(default)]
    pub false_easting: f64,
    #[serde(default)]
    pub false_northing: f64,
}

impl LccParams {
    /// Parameters of the NWM / WRF-Hydro 1 km CONUS grid.
    pub fn nwm_conus() -> Self {
        Self {
            standard_parallel_1: 30.0,
            standard_parallel_2: 60.0,
            latitude_of_origin: 40.0,
            central_meridian: -97.0,
            earth_radius: 6_370_000.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl Default for LccParams {
    fn default() -> Self {
        Self::nwm_conus()
    }
}

/// A validated Lambert Conformal Conic projection on a sphere.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    params: LccParams,
    /// Central meridian in radians
    lon0: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Build a projection, rejecting non-physical parameters.
    pub fn new(params: LccParams) -> ProjectionResult<Self> {
        validate_latitude("standard_parallel_1", params.standard_parallel_1)?;
        validate_latitude("standard_parallel_2", params.standard_parallel_2)?;
        validate_latitude("latitude_of_origin", params.latitude_of_origin)?;

        for (name, value) in [
            ("standard_parallel_1", params.standard_parallel_1),
            ("standard_parallel_2", params.standard_parallel_2),
        ] {
            if (value.abs() - 90.0).abs() < 1e-10 {
                return Err(ProjectionError::InvalidParameter {
                    name,
                    value,
                    reason: "standard parallel cannot be a pole".to_string(),
                });
            }
        }

        if !params.central_meridian.is_finite() || params.central_meridian.abs() > 360.0 {
            return Err(ProjectionError::InvalidParameter {
                name: "central_meridian",
                value: params.central_meridian,
                reason: "must be within [-360, 360] degrees".to_string(),
            });
        }

        if !params.earth_radius.is_finite() || params.earth_radius <= 0.0 {
            return Err(ProjectionError::InvalidParameter {
                name: "earth_radius",
                value: params.earth_radius,
                reason: "must be a positive finite length".to_string(),
            });
        }

        for (name, value) in [
            ("false_easting", params.false_easting),
            ("false_northing", params.false_northing),
        ] {
            if !value.is_finite() {
                return Err(ProjectionError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite".to_string(),
                });
            }
        }

        let lat1 = params.standard_parallel_1.to_radians();
        let lat2 = params.standard_parallel_2.to_radians();
        let lat0 = params.latitude_of_origin.to_radians();

        // Compute cone constant n
        let n = if (lat1 - lat2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            lat1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (lat1.cos() / lat2.cos()).ln();
            let tan_ratio = (half_angle_tan(lat2) / half_angle_tan(lat1)).ln();
            ln_ratio / tan_ratio
        };

        if !n.is_finite() || n.abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameter {
                name: "standard_parallel_2",
                value: params.standard_parallel_2,
                reason: "standard parallels are symmetric about the equator; cone constant is zero"
                    .to_string(),
            });
        }

        let f = lat1.cos() * half_angle_tan(lat1).powf(n) / n;
        let rho0 = params.earth_radius * f / half_angle_tan(lat0).powf(n);

        if !f.is_finite() || !rho0.is_finite() {
            return Err(ProjectionError::InvalidParameter {
                name: "latitude_of_origin",
                value: params.latitude_of_origin,
                reason: "origin latitude is the pole opposite the cone apex".to_string(),
            });
        }

        Ok(Self {
            params,
            lon0: params.central_meridian.to_radians(),
            n,
            f,
            rho0,
        })
    }

    pub fn params(&self) -> &LccParams {
        &self.params
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Convert geographic coordinates (degrees) to projected metres.
    ///
    /// Returns `(x, y)`.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> ProjectionResult<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(ProjectionError::NonFinite {
                x: lon_deg,
                y: lat_deg,
            });
        }

        let lat = lat_deg.to_radians();
        let dlon = normalize_radians(lon_deg.to_radians() - self.lon0);

        let rho = self.params.earth_radius * self.f / half_angle_tan(lat).powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin() + self.params.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.params.false_northing;

        Ok((x, y))
    }

    /// Convert projected metres to geographic coordinates (degrees).
    ///
    /// Returns `(lon, lat)` with longitude normalised to [-180, 180].
    pub fn inverse(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }

        let sign = self.n.signum();
        let dx = x - self.params.false_easting;
        let dy = self.rho0 - (y - self.params.false_northing);

        let rho = sign * (dx * dx + dy * dy).sqrt();
        if rho == 0.0 {
            // Apex of the cone
            return Ok((self.params.central_meridian, sign * 90.0));
        }

        let theta = (sign * dx).atan2(sign * dy);
        let lat = 2.0 * (self.params.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - PI / 2.0;
        let lon = normalize_radians(self.lon0 + theta / self.n);

        Ok((lon.to_degrees(), lat.to_degrees()))
    }
}

/// tan(π/4 + φ/2)
fn half_angle_tan(lat: f64) -> f64 {
    (PI / 4.0 + lat / 2.0).tan()
}

/// Normalize an angle to [-π, π].
fn normalize_radians(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

fn validate_latitude(name: &'static str, value: f64) -> ProjectionResult<()> {
    if !value.is_finite() || value.abs() > 90.0 {
        return Err(ProjectionError::InvalidParameter {
            name,
            value,
            reason: "latitude must be within [-90, 90] degrees".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        let proj = LambertConformal::new(LccParams::nwm_conus()).unwrap();
        let (x, y) = proj.forward(-97.0, 40.0).unwrap();
        assert!(x.abs() < 1e-6, "x should be ~0, got {}", x);
        assert!(y.abs() < 1e-6, "y should be ~0, got {}", y);

        let (lon, lat) = proj.inverse(0.0, 0.0).unwrap();
        assert!((lon + 97.0).abs() < 1e-9);
        assert!((lat - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_conus_points() {
        let proj = LambertConformal::new(LccParams::nwm_conus()).unwrap();

        for (lon, lat) in [(-122.3, 47.6), (-80.2, 25.8), (-105.0, 39.7), (-69.0, 45.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-6, "lon roundtrip failed: {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "lat roundtrip failed: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_west_of_meridian_is_negative_x() {
        let proj = LambertConformal::new(LccParams::nwm_conus()).unwrap();
        let (x, _) = proj.forward(-110.0, 40.0).unwrap();
        assert!(x < 0.0, "x should be negative west of -97, got {}", x);

        let (_, y) = proj.forward(-97.0, 45.0).unwrap();
        assert!(y > 0.0, "y should be positive north of origin, got {}", y);
    }

    #[test]
    fn test_tangent_cone() {
        let params = LccParams {
            standard_parallel_1: 38.5,
            standard_parallel_2: 38.5,
            latitude_of_origin: 38.5,
            central_meridian: -97.5,
            earth_radius: 6_371_229.0,
            false_easting: 0.0,
            false_northing: 0.0,
        };
        let proj = LambertConformal::new(params).unwrap();
        assert!((proj.cone_constant() - 38.5f64.to_radians().sin()).abs() < 1e-12);

        let (x, y) = proj.forward(-94.5, 39.0).unwrap();
        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon + 94.5).abs() < 1e-6);
        assert!((lat - 39.0).abs() < 1e-6);
    }

    #[test]
    fn test_false_origin_shifts_coordinates() {
        let params = LccParams {
            false_easting: 500_000.0,
            false_northing: 250_000.0,
            ..LccParams::nwm_conus()
        };
        let proj = LambertConformal::new(params).unwrap();
        let (x, y) = proj.forward(-97.0, 40.0).unwrap();
        assert!((x - 500_000.0).abs() < 1e-6);
        assert!((y - 250_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let params = LccParams {
            standard_parallel_1: 95.0,
            ..LccParams::nwm_conus()
        };
        let err = LambertConformal::new(params).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidParameter { name: "standard_parallel_1", .. }
        ));
    }

    #[test]
    fn test_rejects_polar_standard_parallel() {
        let params = LccParams {
            standard_parallel_2: 90.0,
            ..LccParams::nwm_conus()
        };
        assert!(LambertConformal::new(params).is_err());
    }

    #[test]
    fn test_rejects_symmetric_parallels() {
        let params = LccParams {
            standard_parallel_1: 30.0,
            standard_parallel_2: -30.0,
            ..LccParams::nwm_conus()
        };
        assert!(LambertConformal::new(params).is_err());
    }

    #[test]
    fn test_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = LccParams {
                earth_radius: radius,
                ..LccParams::nwm_conus()
            };
            assert!(LambertConformal::new(params).is_err(), "radius {} accepted", radius);
        }
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let proj = LambertConformal::new(LccParams::nwm_conus()).unwrap();
        assert!(matches!(
            proj.inverse(f64::NAN, 0.0),
            Err(ProjectionError::NonFinite { .. })
        ));
        assert!(proj.forward(0.0, f64::INFINITY).is_err());
    }
}
