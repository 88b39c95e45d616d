//! # Projection module
//!
//! Converts geodetic points (longitude, latitude, elevation) into the local Cartesian frame used
//! by the rest of the software. The frame is centred on the mean longitude/latitude of the input
//! with X pointing east, Y pointing north and Z up, all in meters.
//!
//! The only projection currently provided is [`Equirectangular`], which is valid over the length
//! of a single street. It must not be used for paths spanning a large range of latitudes.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub use params::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    /// Longitude in degrees
    pub lon_deg: f64,

    /// Latitude in degrees
    pub lat_deg: f64,

    /// Elevation above the reference surface in meters, if known
    pub elevation_m: Option<f64>,
}

/// Equirectangular (local tangent plane) projection.
#[derive(Debug, Clone, Default)]
pub struct Equirectangular {
    params: ProjParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while projecting points.
#[derive(Debug, thiserror::Error)]
pub enum ProjError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A projection from geodetic coordinates into the local frame.
pub trait Projection {
    /// Project the points, returning one local point per input point in the same order.
    fn project(&self, points: &[GeodeticPoint]) -> Result<Vec<Vector3<f64>>, ProjError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeodeticPoint {
    pub fn new(lon_deg: f64, lat_deg: f64, elevation_m: Option<f64>) -> Self {
        Self { lon_deg, lat_deg, elevation_m }
    }
}

impl Equirectangular {
    pub fn new(params: ProjParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ProjParams {
        &self.params
    }
}

impl Projection for Equirectangular {
    fn project(&self, points: &[GeodeticPoint]) -> Result<Vec<Vector3<f64>>, ProjError> {
        if points.is_empty() {
            return Err(ProjError::InvalidInput(String::from("no points to project")));
        }

        if let Some(i) = points
            .iter()
            .position(|p| !p.lon_deg.is_finite() || !p.lat_deg.is_finite())
        {
            return Err(ProjError::InvalidInput(format!(
                "point {} has a non-finite longitude or latitude", i
            )));
        }

        // Elevation must be given for all points or for none of them
        let num_with_elev = points.iter().filter(|p| p.elevation_m.is_some()).count();
        if num_with_elev != 0 && num_with_elev != points.len() {
            return Err(ProjError::InvalidInput(format!(
                "elevation is only set on {} of {} points", num_with_elev, points.len()
            )));
        }

        // ---- RECENTRE ----

        let num = points.len() as f64;
        let mean_lon_deg = points.iter().map(|p| p.lon_deg).sum::<f64>() / num;
        let mean_lat_deg = points.iter().map(|p| p.lat_deg).sum::<f64>() / num;

        // ---- SCALE ----

        let lon_degree_m = (std::f64::consts::PI / 180.0)
            * self.params.earth_radius_m
            * mean_lat_deg.to_radians().cos();
        let lat_degree_m = self.params.lat_degree_m;

        trace!(
            "Projecting {} points about ({:.6}, {:.6}), 1 deg lon = {:.3} m",
            points.len(), mean_lon_deg, mean_lat_deg, lon_degree_m
        );

        // ---- ELEVATION ----

        // Shift so that the lowest point sits on the baseline
        let min_elev_m = points
            .iter()
            .filter_map(|p| p.elevation_m)
            .fold(std::f64::INFINITY, f64::min);

        Ok(points
            .iter()
            .map(|p| {
                let z = match p.elevation_m {
                    Some(e) => e - min_elev_m + self.params.elevation_baseline_m,
                    None => self.params.elevation_baseline_m,
                };

                Vector3::new(
                    (p.lon_deg - mean_lon_deg) * lon_degree_m,
                    (p.lat_deg - mean_lat_deg) * lat_degree_m,
                    z,
                )
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn street() -> Vec<GeodeticPoint> {
        vec![
            GeodeticPoint::new(19.9380, 50.0500, Some(210.0)),
            GeodeticPoint::new(19.9390, 50.0505, Some(212.5)),
            GeodeticPoint::new(19.9400, 50.0510, Some(215.0)),
        ]
    }

    #[test]
    fn test_empty_input() {
        let proj = Equirectangular::default();
        assert!(matches!(proj.project(&[]), Err(ProjError::InvalidInput(_))));
    }

    #[test]
    fn test_mixed_elevation() {
        let proj = Equirectangular::default();
        let mut points = street();
        points[1].elevation_m = None;
        assert!(matches!(proj.project(&points), Err(ProjError::InvalidInput(_))));
    }

    #[test]
    fn test_recentre_and_scale() {
        let proj = Equirectangular::default();
        let out = proj.project(&street()).unwrap();

        assert_eq!(out.len(), 3);

        // Points are symmetric about the middle one so it lands on the origin
        assert_relative_eq!(out[1].x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(out[1].y, 0.0, epsilon = 1e-6);

        // Mean of the output is the origin
        let mean = out.iter().fold(Vector3::zeros(), |acc, p| acc + p) / 3.0;
        assert_relative_eq!(mean.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(mean.y, 0.0, epsilon = 1e-6);

        // 0.0005 deg of latitude
        assert_relative_eq!(out[2].y, 0.0005 * LAT_DEGREE_M, epsilon = 1e-6);

        // 0.001 deg of longitude at the mean latitude
        let lon_m = 0.001
            * (std::f64::consts::PI / 180.0)
            * EARTH_RADIUS_M
            * 50.0505f64.to_radians().cos();
        assert_relative_eq!(out[2].x, lon_m, epsilon = 1e-6);
    }

    #[test]
    fn test_elevation_baseline() {
        let proj = Equirectangular::new(ProjParams {
            elevation_baseline_m: 1.0,
            ..Default::default()
        });
        let out = proj.project(&street()).unwrap();

        assert_relative_eq!(out[0].z, 1.0);
        assert_relative_eq!(out[1].z, 3.5);
        assert_relative_eq!(out[2].z, 6.0);

        // No elevations means everything is on the baseline
        let flat: Vec<GeodeticPoint> = street()
            .into_iter()
            .map(|p| GeodeticPoint { elevation_m: None, ..p })
            .collect();
        assert!(proj.project(&flat).unwrap().iter().all(|p| p.z == 1.0));
    }

    #[test]
    fn test_projection_repeatable() {
        let proj = Equirectangular::default();
        let a = proj.project(&street()).unwrap();
        let b = proj.project(&street()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_point() {
        let proj = Equirectangular::default();
        let out = proj.project(&[GeodeticPoint::new(-1.4, 50.9, Some(30.0))]).unwrap();
        assert_eq!(out, vec![Vector3::new(0.0, 0.0, 0.0)]);
    }
}
