//! Run telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::RunMonParams;
use crate::road::Road;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Value of [`TelemetryRecord::finish`] while the run is in progress.
pub const NOT_FINISHED: &str = "Not finished";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything recorded about one run.
///
/// The three per-tick sequences are appended to once per tick. `out_of_bounds` has exactly one
/// entry per completed tick, `position` and `velocity` skip ticks on which the agent's pose was
/// not available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Name of the road
    pub name: String,

    /// Length of the road in meters
    pub length: f64,

    pub n_points: usize,

    /// Centerline points of the road in meters
    pub points: Vec<[f64; 3]>,

    /// Units: seconds
    pub tick_interval: f64,

    /// Units: meters/second
    pub speed_limit: f64,

    pub risk_value: f64,

    /// How the run ended
    pub finish: String,

    /// True if the agent reached the goal
    pub success: bool,

    /// Fraction of the agent's footprint outside the lane at each tick
    pub out_of_bounds: Vec<f64>,

    pub position: Vec<[f64; 3]>,

    pub velocity: Vec<[f64; 3]>,
}

/// One row of the per-tick archive.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub elapsed_s: f64,
    pub oob_ratio: f64,
    pub pos_x_m: Option<f64>,
    pub pos_y_m: Option<f64>,
    pub pos_z_m: Option<f64>,
    pub vel_x_ms: Option<f64>,
    pub vel_y_ms: Option<f64>,
    pub vel_z_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TelemetryRecord {
    /// An empty record describing the given road and run configuration.
    pub fn new(road: &Road, params: &RunMonParams) -> Self {
        Self {
            name: road.name().to_string(),
            length: road.length_m(),
            n_points: road.n_points(),
            points: road.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
            tick_interval: params.tick_interval_s,
            speed_limit: params.speed_limit_ms,
            risk_value: params.risk_value,
            finish: String::from(NOT_FINISHED),
            success: false,
            out_of_bounds: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
        }
    }
}
