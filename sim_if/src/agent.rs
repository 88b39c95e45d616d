//! # Agent state samples
//!
//! These are the values read from the simulated vehicle at each sampling instant. Positions are
//! in meters in the road's local frame, velocities in meters per second.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The bottom face of the vehicle's bounding box.
///
/// Corners are given in drive order so that they form a simple quadrilateral when joined in
/// sequence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AgentBbox {
    pub front_bottom_left: [f64; 3],
    pub front_bottom_right: [f64; 3],
    pub rear_bottom_right: [f64; 3],
    pub rear_bottom_left: [f64; 3],
}

/// Kinematic state of the vehicle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    /// Position of the vehicle's reference point
    pub pos: [f64; 3],

    /// Velocity of the vehicle
    pub vel: [f64; 3],
}

/// One sample of the vehicle as reported by the simulator bridge.
///
/// Either part may be missing if the simulator did not report it for this instant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentSample {
    #[serde(default)]
    pub bbox: Option<AgentBbox>,

    #[serde(default)]
    pub state: Option<AgentState>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AgentBbox {
    /// Corners of the box in drive order, starting at the front left.
    pub fn corners(&self) -> [[f64; 3]; 4] {
        [
            self.front_bottom_left,
            self.front_bottom_right,
            self.rear_bottom_right,
            self.rear_bottom_left,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sample_missing_fields() {
        let sample: AgentSample = serde_json::from_str(
            r#"{"state": {"pos": [1.0, 2.0, 0.0], "vel": [0.0, 0.0, 0.0]}}"#
        ).unwrap();

        assert!(sample.bbox.is_none());
        assert_eq!(sample.state.unwrap().pos, [1.0, 2.0, 0.0]);

        let samples: Vec<AgentSample> = serde_json::from_str("[{}, {}]").unwrap();
        assert_eq!(samples, vec![AgentSample::default(); 2]);
    }
}
