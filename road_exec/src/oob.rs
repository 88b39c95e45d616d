//! # Out of bounds comparator
//!
//! Measures how much of the agent's footprint lies outside the lane polygon.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use geo::{Area, BooleanOps, Contains, Intersects, Polygon};
use nalgebra::Vector3;
use sim_if::agent::AgentBbox;
use util::maths::clamp;

use crate::{geom, lane::LanePolygon};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Footprints with a smaller area than this are considered degenerate.
///
/// Units: square meters
pub const MIN_FOOTPRINT_AREA_M2: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The four bottom corners of the agent's bounding box, in ring order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub corners_m: [Vector3<f64>; 4],
}

/// Compares agent footprints against a fixed lane polygon.
pub struct FootprintComparator {
    lane: Polygon<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OobError {
    #[error("The footprint is degenerate (area {0} m^2)")]
    DegenerateFootprint(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Footprint {
    pub fn new(corners_m: [Vector3<f64>; 4]) -> Self {
        Self { corners_m }
    }

    /// Mean of the four corners.
    pub fn centroid_m(&self) -> Vector3<f64> {
        self.corners_m
            .iter()
            .fold(Vector3::zeros(), |acc, c| acc + c)
            / 4.0
    }

    pub fn is_finite(&self) -> bool {
        self.corners_m
            .iter()
            .all(|c| c.x.is_finite() && c.y.is_finite() && c.z.is_finite())
    }

    pub fn to_geo(&self) -> Polygon<f64> {
        geom::to_polygon(&self.corners_m)
    }
}

impl From<AgentBbox> for Footprint {
    fn from(bbox: AgentBbox) -> Self {
        let c = bbox.corners();
        Self::new([
            Vector3::from(c[0]),
            Vector3::from(c[1]),
            Vector3::from(c[2]),
            Vector3::from(c[3]),
        ])
    }
}

impl FootprintComparator {
    pub fn new(lane: &LanePolygon) -> Self {
        Self {
            lane: lane.to_geo(),
        }
    }

    /// Fraction of the footprint's area lying outside the lane, in [0, 1].
    ///
    /// A footprint not touching the lane at all is exactly 1, one lying entirely inside the lane
    /// is exactly 0.
    pub fn oob_ratio(&self, footprint: &Footprint) -> Result<f64, OobError> {
        if !footprint.is_finite() {
            return Err(OobError::DegenerateFootprint(std::f64::NAN));
        }

        let fp = footprint.to_geo();
        let fp_area = fp.unsigned_area();
        if !(fp_area >= MIN_FOOTPRINT_AREA_M2) {
            return Err(OobError::DegenerateFootprint(fp_area));
        }

        if !self.lane.intersects(&fp) {
            return Ok(1.0);
        }
        if self.lane.contains(&fp) {
            return Ok(0.0);
        }

        let outside_area = fp.difference(&self.lane).unsigned_area();

        Ok(clamp(outside_area / fp_area, 0.0, 1.0))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::road::Centerline;
    use approx::assert_relative_eq;

    /// Axis aligned footprint with the given x and y extents.
    fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> Footprint {
        Footprint::new([
            Vector3::new(x1, y1, 0.0),
            Vector3::new(x1, y0, 0.0),
            Vector3::new(x0, y0, 0.0),
            Vector3::new(x0, y1, 0.0),
        ])
    }

    fn comparator() -> FootprintComparator {
        // Lane covers x in [0, 100], y in [-4, 0]
        let line = Centerline::new(vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(100.0, 0.0, 0.0)])
            .unwrap();
        FootprintComparator::new(&LanePolygon::from_centerline(&line, 8.0).unwrap())
    }

    #[test]
    fn test_inside() {
        assert_eq!(comparator().oob_ratio(&rect(10.0, 14.0, -3.0, -1.0)), Ok(0.0));
    }

    #[test]
    fn test_outside() {
        assert_eq!(comparator().oob_ratio(&rect(10.0, 14.0, 5.0, 7.0)), Ok(1.0));
    }

    #[test]
    fn test_half_out() {
        // Straddles the centerline, half of it on the wrong side
        let ratio = comparator().oob_ratio(&rect(10.0, 14.0, -1.0, 1.0)).unwrap();
        assert_relative_eq!(ratio, 0.5, epsilon = 1e-9);

        // A quarter over the far edge
        let ratio = comparator().oob_ratio(&rect(10.0, 14.0, -4.5, -2.5)).unwrap();
        assert_relative_eq!(ratio, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_ratio_bounds_on_curve() {
        use crate::resample::{self, ResampleParams, SplineDegree};

        let curve = [
            [0.0, 0.0],
            [40.0, 5.0],
            [80.0, 20.0],
            [115.0, 45.0],
            [140.0, 80.0],
            [155.0, 120.0],
            [160.0, 160.0],
        ];
        let params = ResampleParams {
            degree: SplineDegree::Cubic,
            ..Default::default()
        };

        // Both turning directions
        for mirror in [1.0, -1.0].iter() {
            let raw = Centerline::new(
                curve
                    .iter()
                    .map(|p| Vector3::new(mirror * p[0], p[1], 0.0))
                    .collect(),
            )
            .unwrap();
            let line = resample::resample(&raw, &params).unwrap();
            let cmp = FootprintComparator::new(&LanePolygon::from_centerline(&line, 8.0).unwrap());

            let mut num_partial = 0;
            for (i, w) in line.points().windows(2).enumerate() {
                let centre = w[0] + (w[1] - w[0]) * 0.37;
                let dir = (w[1] - w[0]).normalize();
                let normal = Vector3::new(dir.y, -dir.x, 0.0);

                for lateral in -6..=8 {
                    for rot in 0..12 {
                        let yaw = (rot * 30 + i) as f64 * std::f64::consts::PI / 180.0;
                        let fwd = Vector3::new(yaw.cos(), yaw.sin(), 0.0) * 2.35;
                        let side = Vector3::new(-yaw.sin(), yaw.cos(), 0.0) * 0.95;
                        let c = centre + normal * (lateral as f64 * 0.75);

                        let fp = Footprint::new([
                            c + fwd + side,
                            c + fwd - side,
                            c - fwd - side,
                            c - fwd + side,
                        ]);
                        let ratio = cmp.oob_ratio(&fp).unwrap();

                        assert!(
                            (0.0..=1.0).contains(&ratio),
                            "ratio {} at segment {}, lateral {}, rot {}",
                            ratio,
                            i,
                            lateral,
                            rot
                        );
                        if ratio > 0.0 && ratio < 1.0 {
                            num_partial += 1;
                        }
                    }
                }
            }

            // The sweep crosses both lane edges
            assert!(num_partial > 0);
        }
    }

    #[test]
    fn test_degenerate() {
        let flat = Footprint::new([Vector3::new(1.0, -1.0, 0.0); 4]);
        assert_eq!(
            comparator().oob_ratio(&flat),
            Err(OobError::DegenerateFootprint(0.0))
        );

        let mut nan = rect(10.0, 14.0, -3.0, -1.0);
        nan.corners_m[2].x = std::f64::NAN;
        assert!(comparator().oob_ratio(&nan).is_err());
    }

    #[test]
    fn test_from_bbox() {
        let bbox = AgentBbox {
            front_bottom_left: [2.0, 1.0, 0.0],
            front_bottom_right: [2.0, -1.0, 0.0],
            rear_bottom_right: [-2.0, -1.0, 0.0],
            rear_bottom_left: [-2.0, 1.0, 0.0],
        };

        let fp = Footprint::from(bbox);
        assert_eq!(fp.corners_m[1], Vector3::new(2.0, -1.0, 0.0));
        assert_eq!(fp.centroid_m(), Vector3::zeros());
    }
}
