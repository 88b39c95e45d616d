//! Sources from which a road centerline is produced

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fs, path::Path};

use nalgebra::Vector3;
use serde::Deserialize;

use super::{Centerline, RoadError};
use crate::proj::{GeodeticPoint, Projection};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// On disk format of a synthetic road.
#[derive(Debug, Deserialize)]
struct SyntheticFile {
    name: String,

    /// `[x, y, z]` points in meters
    points: Vec<[f64; 3]>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Where the points of a road come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadSource {
    /// Points already in the local metric frame, for example produced by a road generator.
    Synthetic {
        name: String,
        points_m: Vec<Vector3<f64>>,
    },

    /// Geodetic points taken from map data.
    Map {
        name: String,
        points: Vec<GeodeticPoint>,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl RoadSource {
    /// Load a synthetic road from a JSON file of the form
    /// `{"name": "...", "points": [[x, y, z], ...]}`.
    pub fn synthetic_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RoadError> {
        let s = fs::read_to_string(path.as_ref())
            .map_err(|e| RoadError::LoadError(path.as_ref().to_path_buf(), e))?;

        let file: SyntheticFile = serde_json::from_str(&s)
            .map_err(|e| RoadError::ParseError(path.as_ref().to_path_buf(), e))?;

        Ok(RoadSource::Synthetic {
            name: file.name,
            points_m: file.points.iter().map(|p| Vector3::from(*p)).collect(),
        })
    }

    /// Build a synthetic road from a flat `[x0, y0, z0, x1, y1, z1, ...]` array, as produced by
    /// search based generators which encode a road as a single gene vector.
    pub fn from_flat(name: &str, flat: &[f64]) -> Result<Self, RoadError> {
        if flat.len() % 3 != 0 {
            return Err(RoadError::InvalidInput(format!(
                "flat point array has length {}, which is not a multiple of 3",
                flat.len()
            )));
        }

        Ok(RoadSource::Synthetic {
            name: name.to_string(),
            points_m: flat
                .chunks_exact(3)
                .map(|c| Vector3::new(c[0], c[1], c[2]))
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            RoadSource::Synthetic { name, .. } => name,
            RoadSource::Map { name, .. } => name,
        }
    }

    /// Produce the raw centerline of this source in the local metric frame.
    ///
    /// Map points are projected with the given projection, and repeated points are dropped since
    /// map data often duplicates the node joining two ways.
    pub fn centerline(&self, proj: &dyn Projection) -> Result<Centerline, RoadError> {
        match self {
            RoadSource::Synthetic { points_m, .. } => {
                Centerline::new(points_m.clone()).map_err(RoadError::Centerline)
            }
            RoadSource::Map { points, .. } => {
                let projected = proj.project(points)?;
                Centerline::new_dedup(projected).map_err(RoadError::Centerline)
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
