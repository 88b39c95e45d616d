//! Projection parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Mean radius of the Earth.
///
/// Units: meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude.
///
/// Units: meters
pub const LAT_DEGREE_M: f64 = 111_200.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the equirectangular projection.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjParams {
    /// Radius of the sphere used to scale longitude.
    ///
    /// Units: meters
    pub earth_radius_m: f64,

    /// Length of one degree of latitude.
    ///
    /// Units: meters
    pub lat_degree_m: f64,

    /// Height the lowest projected point is moved to.
    ///
    /// Usually 0 or 1 meter, a small positive value keeps the vehicle from spawning under the
    /// road surface.
    ///
    /// Units: meters
    pub elevation_baseline_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ProjParams {
    fn default() -> Self {
        Self {
            earth_radius_m: EARTH_RADIUS_M,
            lat_degree_m: LAT_DEGREE_M,
            elevation_baseline_m: 0.0,
        }
    }
}
