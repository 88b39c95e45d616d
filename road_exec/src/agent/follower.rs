//! Kinematic lane following agent
//!
//! Drives a rectangular vehicle along a path parallel to the road centerline at constant speed.
//! Each call to `current_footprint` advances the vehicle by one tick interval.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::{AgentError, AgentKinematics, AgentStateProvider};
use crate::{
    geom,
    lane::{self, LaneError},
    oob::Footprint,
    road::Road,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerParams {
    /// Units: meters per second
    pub speed_ms: f64,

    /// Units: meters
    pub vehicle_length_m: f64,

    /// Units: meters
    pub vehicle_width_m: f64,

    /// Offset of the driven path from the middle of the lane, positive to the right.
    ///
    /// Units: meters
    pub lateral_offset_m: f64,
}

pub struct LaneFollowerAgent {
    params: FollowerParams,

    /// Path followed by the middle of the vehicle
    path_m: Vec<Vector3<f64>>,

    /// Horizontal distance along the path of each path point
    dist_m: Vec<f64>,

    start_m: f64,

    step_s: f64,

    num_polls: u64,

    current: Option<AgentKinematics>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for FollowerParams {
    fn default() -> Self {
        Self {
            speed_ms: 13.4112,
            vehicle_length_m: 4.7,
            vehicle_width_m: 1.9,
            lateral_offset_m: 0.0,
        }
    }
}

impl LaneFollowerAgent {
    /// Create a new follower on the given road.
    ///
    /// The vehicle starts `start_m` along its path and moves `speed_ms * step_s` meters per poll.
    pub fn new(
        road: &Road,
        params: FollowerParams,
        start_m: f64,
        step_s: f64,
    ) -> Result<Self, AgentError> {
        // The middle of the lane lies a quarter of the road width right of the centerline, so the
        // path is the right edge of a road half as wide, widened by the lateral offset.
        let path_width_m = road.width_m() / 2.0 + 2.0 * params.lateral_offset_m;
        let raw = lane::right_edge_points(road.centerline(), path_width_m)?;

        let mut path_m: Vec<Vector3<f64>> = Vec::with_capacity(raw.len());
        let mut dist_m: Vec<f64> = Vec::with_capacity(raw.len());

        for p in raw {
            match path_m.last() {
                None => dist_m.push(0.0),
                Some(last) => {
                    let d = geom::horizontal_dist(last, &p);
                    if d < geom::COINCIDENT_EPSILON_M {
                        continue;
                    }
                    dist_m.push(dist_m[dist_m.len() - 1] + d);
                }
            }
            path_m.push(p);
        }

        if path_m.len() < 2 {
            return Err(AgentError::PathError(LaneError::InsufficientPoints(
                path_m.len(),
            )));
        }

        debug!(
            "Lane follower path is {:.1} m long",
            dist_m[dist_m.len() - 1]
        );

        Ok(Self {
            params,
            path_m,
            dist_m,
            start_m,
            step_s,
            num_polls: 0,
            current: None,
        })
    }

    /// Total length of the driven path.
    ///
    /// Units: meters
    pub fn path_length_m(&self) -> f64 {
        self.dist_m[self.dist_m.len() - 1]
    }

    /// Position and unit heading at distance `s` along the path, clamped to the path's ends.
    fn at(&self, s: f64) -> (Vector3<f64>, Vector2<f64>) {
        let n = self.path_m.len();
        let s = s.max(0.0).min(self.path_length_m());

        let i = self
            .dist_m
            .partition_point(|&d| d <= s)
            .saturating_sub(1)
            .min(n - 2);

        let (a, b) = (&self.path_m[i], &self.path_m[i + 1]);
        let frac = (s - self.dist_m[i]) / (self.dist_m[i + 1] - self.dist_m[i]);

        let pos = a + (b - a) * frac;
        let dir = (geom::xy(b) - geom::xy(a)).normalize();

        (pos, dir)
    }
}

impl AgentStateProvider for LaneFollowerAgent {
    fn current_footprint(&mut self) -> Result<Footprint, AgentError> {
        self.num_polls += 1;

        let s = self.start_m + self.num_polls as f64 * self.params.speed_ms * self.step_s;
        let (c, dir) = self.at(s);

        let velocity_ms = if s < self.path_length_m() {
            Vector3::new(dir.x, dir.y, 0.0) * self.params.speed_ms
        } else {
            Vector3::zeros()
        };
        self.current = Some(AgentKinematics {
            position_m: c,
            velocity_ms,
        });

        let f = dir * (self.params.vehicle_length_m / 2.0);
        let r = Vector2::new(dir.y, -dir.x) * (self.params.vehicle_width_m / 2.0);
        let corner = |v: Vector2<f64>| Vector3::new(c.x + v.x, c.y + v.y, c.z);

        Ok(Footprint::new([
            corner(f - r),
            corner(f + r),
            corner(-f + r),
            corner(-f - r),
        ]))
    }

    fn current_pose(&mut self) -> Option<AgentKinematics> {
        self.current
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
