//! # Map data
//!
//! Turns saved map data into a road source. Street geometry comes from an Overpass API response
//! and elevations from an [`ElevationSource`]. Fetching either over the network is left to
//! external tooling, this module only reads what has been saved.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod elevation;
pub mod osm;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fs, path::Path, path::PathBuf};

use log::info;

use crate::{proj::GeodeticPoint, road::RoadSource};
pub use elevation::{ElevationError, ElevationSource, FlatElevation, ResponseFileElevation};

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid map data: {0}")]
    InvalidInput(String),

    #[error("Cannot read map file {0:?}: {1}")]
    LoadError(PathBuf, std::io::Error),

    #[error("Cannot parse map data: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Elevation lookup failed: {0}")]
    Elevation(#[from] ElevationError),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a road source for a named street from an Overpass response.
pub fn street_source(
    overpass_json: &str,
    street_name: &str,
    elevation: &dyn ElevationSource,
) -> Result<RoadSource, MapError> {
    let lon_lat = osm::street_lines(overpass_json, street_name)?;

    let lat_lon: Vec<(f64, f64)> = lon_lat.iter().map(|&(lon, lat)| (lat, lon)).collect();
    let elevations = elevation.elevations(&lat_lon)?;

    if elevations.len() != lon_lat.len() {
        return Err(MapError::Elevation(ElevationError::ExternalUnavailable(
            format!(
                "expected {} elevations, got {}",
                lon_lat.len(),
                elevations.len()
            ),
        )));
    }

    info!(
        "Street \"{}\" has {} points",
        street_name,
        lon_lat.len()
    );

    Ok(RoadSource::Map {
        name: street_name.to_string(),
        points: lon_lat
            .iter()
            .zip(elevations.iter())
            .map(|(&(lon, lat), &el)| GeodeticPoint::new(lon, lat, Some(el)))
            .collect(),
    })
}

/// Read an Overpass response file and build a road source for the named street.
pub fn street_source_from_file<P: AsRef<Path>>(
    path: P,
    street_name: &str,
    elevation: &dyn ElevationSource,
) -> Result<RoadSource, MapError> {
    let s = fs::read_to_string(path.as_ref())
        .map_err(|e| MapError::LoadError(path.as_ref().to_path_buf(), e))?;

    street_source(&s, street_name, elevation)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::proj::{Equirectangular, ProjParams};

    const RESPONSE: &str = r#"{"elements": [
        {"type": "way", "tags": {"name": "Mill Road"},
         "geometry": [{"lat": 50.050, "lon": 19.938}, {"lat": 50.051, "lon": 19.939}]},
        {"type": "way", "tags": {"name": "Mill Road"},
         "geometry": [{"lat": 50.051, "lon": 19.939}, {"lat": 50.052, "lon": 19.941}]}
    ]}"#;

    struct ExhaustedService;

    impl ElevationSource for ExhaustedService {
        fn elevations(&self, _: &[(f64, f64)]) -> Result<Vec<f64>, ElevationError> {
            Err(ElevationError::ExternalUnavailable(String::from("quota exceeded")))
        }
    }

    #[test]
    fn test_street_source() {
        let src = street_source(RESPONSE, "Mill Road", &FlatElevation(200.0)).unwrap();
        assert_eq!(src.name(), "Mill Road");

        match &src {
            RoadSource::Map { points, .. } => {
                assert_eq!(points.len(), 3);
                assert_eq!(points[0], GeodeticPoint::new(19.938, 50.050, Some(200.0)));
            }
            _ => panic!("expected a map source"),
        }

        // Flat ground projects to the baseline
        let line = src
            .centerline(&Equirectangular::new(ProjParams::default()))
            .unwrap();
        assert!(line.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_elevation_failure() {
        assert!(matches!(
            street_source(RESPONSE, "Mill Road", &ExhaustedService),
            Err(MapError::Elevation(ElevationError::ExternalUnavailable(_)))
        ));
    }
}
