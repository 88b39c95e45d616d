//! Road parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters describing the road built around a centerline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadParams {
    /// Full width of the road, covering both lanes.
    ///
    /// Units: meters
    pub width_m: f64,

    /// Distance along the first segment at which the agent is spawned.
    ///
    /// Units: meters
    pub spawn_offset_m: f64,

    /// Limits checked before a road is run.
    pub validity: ValidityParams,
}

/// Limits a road must satisfy to be considered valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityParams {
    /// Units: meters
    pub min_length_m: f64,

    /// Units: meters
    pub max_length_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            width_m: 8.0,
            spawn_offset_m: 3.5,
            validity: ValidityParams::default(),
        }
    }
}

impl Default for ValidityParams {
    fn default() -> Self {
        Self {
            min_length_m: 100.0,
            max_length_m: 2000.0,
        }
    }
}
