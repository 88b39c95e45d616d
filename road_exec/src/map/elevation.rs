//! Elevation sources for map points

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Provides the ground elevation at a set of locations.
pub trait ElevationSource {
    /// Elevation in meters of each `(latitude, longitude)` location, in the same order.
    fn elevations(&self, lat_lon: &[(f64, f64)]) -> Result<Vec<f64>, ElevationError>;
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The same elevation everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatElevation(pub f64);

/// Elevations read from a saved elevation service response.
///
/// The file follows the opentopodata format, `{"results": [{"elevation": 210.5, ...}, ...]}`,
/// with one result per requested location.
#[derive(Debug, Clone)]
pub struct ResponseFileElevation {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ElevationError {
    #[error("Elevation data unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("Cannot read elevation file {0:?}: {1}")]
    LoadError(PathBuf, std::io::Error),

    #[error("Cannot parse elevation response: {0}")]
    ParseError(#[from] serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ElevationSource for FlatElevation {
    fn elevations(&self, lat_lon: &[(f64, f64)]) -> Result<Vec<f64>, ElevationError> {
        Ok(vec![self.0; lat_lon.len()])
    }
}

impl ResponseFileElevation {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ElevationSource for ResponseFileElevation {
    fn elevations(&self, lat_lon: &[(f64, f64)]) -> Result<Vec<f64>, ElevationError> {
        let s = fs::read_to_string(&self.path)
            .map_err(|e| ElevationError::LoadError(self.path.clone(), e))?;

        parse_response(&s, lat_lon.len())
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse an elevation service response, which must contain exactly `expected` elevations.
pub fn parse_response(json: &str, expected: usize) -> Result<Vec<f64>, ElevationError> {
    let response: ElevationResponse = serde_json::from_str(json)?;

    if response.results.len() != expected {
        return Err(ElevationError::ExternalUnavailable(format!(
            "expected {} elevations, the response has {}",
            expected,
            response.results.len()
        )));
    }

    response
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.elevation.ok_or_else(|| {
                ElevationError::ExternalUnavailable(format!("no elevation for location {}", i))
            })
        })
        .collect()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
