//! # Lane geometry
//!
//! Derives the geometry of the driving lane from a road centerline. The road is two lanes wide
//! and the agent drives on the right hand lane, so the lane polygon is bounded on one side by the
//! centerline and on the other by the right edge of the road.
//!
//! Edges are computed per segment from the direction of travel `d = p2 - p1`: the left edge point
//! is `p1 + (-d.y, d.x) * w / (2|d|)` and the right edge point is `p1 + (d.y, -d.x) * w / (2|d|)`.
//! Both keep the Z of `p1`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use geo::Polygon;
use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use crate::geom;
use crate::road::Centerline;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Left and right road edge points for one centerline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoints {
    pub left_m: Vector3<f64>,
    pub right_m: Vector3<f64>,
}

/// A position and heading in the local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub position_m: Vector3<f64>,

    /// Heading in degrees, following the simulator's convention of `atan2(-dx, -dy)` for a
    /// direction of travel `(dx, dy)`.
    pub yaw_deg: f64,
}

/// The closed polygon covering the right hand lane of the road.
#[derive(Debug, Clone)]
pub struct LanePolygon {
    ring_m: Vec<Vector3<f64>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LaneError {
    #[error("Lane geometry needs at least 2 centerline points, found {0}")]
    InsufficientPoints(usize),

    #[error("Centerline segment {index} has zero horizontal length")]
    DegenerateSegment { index: usize },

    #[error("Road width must be positive and finite, got {0}")]
    InvalidWidth(f64),

    /// The right edge loops back over the lane at a corner.
    ///
    /// Every right edge point is offset from its own segment, so at a right turn each point
    /// within half the width of the corner lands behind the previous one. Turns beyond a right
    /// angle are always rejected. Below that, densely spaced points make it worse: a corner that
    /// passes with 5 m spacing can fail once resampled to 1-2 m. Use fewer, longer segments at
    /// sharp corners, or round the corner over a radius wider than half the road.
    #[error("The lane polygon intersects itself")]
    SelfIntersecting,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl LanePolygon {
    /// Build the lane polygon of a road.
    ///
    /// The ring is the centerline walked backwards, followed by the right edge point of every
    /// segment walked forwards, followed by the right edge point of the last centerline point
    /// (computed against a virtual point extending the last segment). A centerline of N points
    /// therefore produces a ring of 2N points.
    ///
    /// Rings which cross themselves, which happens when the road turns tighter than half its
    /// width, are rejected (see [`LaneError::SelfIntersecting`]).
    pub fn from_centerline(line: &Centerline, width_m: f64) -> Result<Self, LaneError> {
        let right = right_edge_points(line, width_m)?;

        let mut ring_m: Vec<Vector3<f64>> = line.points().iter().rev().cloned().collect();
        ring_m.extend(right);

        if geom::self_intersects(&ring_m, true) {
            return Err(LaneError::SelfIntersecting);
        }

        Ok(Self { ring_m })
    }

    /// Points of the polygon ring, not closed.
    pub fn ring(&self) -> &[Vector3<f64>] {
        &self.ring_m
    }

    pub fn to_geo(&self) -> Polygon<f64> {
        geom::to_polygon(&self.ring_m)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Compute the road edge points for the segment from `p1` to `p2`.
///
/// Fails if the segment has no horizontal length or the width is not positive.
pub fn edge_offset(
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    width_m: f64,
) -> Result<EdgePoints, LaneError> {
    check_width(width_m)?;

    let d = geom::xy(p2) - geom::xy(p1);
    let len = d.norm();
    if len.is_nan() || len < geom::COINCIDENT_EPSILON_M {
        return Err(LaneError::DegenerateSegment { index: 0 });
    }

    let half = width_m / (2.0 * len);
    let left = Vector2::new(-d.y, d.x) * half;
    let right = Vector2::new(d.y, -d.x) * half;

    Ok(EdgePoints {
        left_m: Vector3::new(p1.x + left.x, p1.y + left.y, p1.z),
        right_m: Vector3::new(p1.x + right.x, p1.y + right.y, p1.z),
    })
}

/// Right edge point for each centerline point.
///
/// Each point uses the segment starting at it, the last point uses the direction of the final
/// segment.
pub fn right_edge_points(line: &Centerline, width_m: f64) -> Result<Vec<Vector3<f64>>, LaneError> {
    let points = line.points();
    if points.len() < 2 {
        return Err(LaneError::InsufficientPoints(points.len()));
    }

    let mut right = Vec::with_capacity(points.len());

    for (index, w) in points.windows(2).enumerate() {
        right.push(
            edge_offset(&w[0], &w[1], width_m)
                .map_err(|e| with_index(e, index))?
                .right_m,
        );
    }

    let n = points.len();
    let last = points[n - 1];
    let extrapolated = last + (last - points[n - 2]);
    right.push(
        edge_offset(&last, &extrapolated, width_m)
            .map_err(|e| with_index(e, n - 2))?
            .right_m,
    );

    Ok(right)
}

/// Pose at which the agent is placed at the start of the road.
///
/// The position is the middle of the right hand lane at the first centerline point, moved
/// `offset_m` along the first segment. The height is the higher of the first two centerline
/// points so the agent is not spawned below the road surface.
pub fn spawn_pose(line: &Centerline, width_m: f64, offset_m: f64) -> Result<Pose, LaneError> {
    let points = line.points();
    if points.len() < 2 {
        return Err(LaneError::InsufficientPoints(points.len()));
    }
    let (p1, p2) = (&points[0], &points[1]);

    let edges = edge_offset(p1, p2, width_m)?;
    let dir = (geom::xy(p2) - geom::xy(p1)).normalize();

    let mid = (geom::xy(p1) + geom::xy(&edges.right_m)) * 0.5;
    let pos = mid + dir * offset_m;

    Ok(Pose {
        position_m: Vector3::new(pos.x, pos.y, p1.z.max(p2.z)),
        yaw_deg: (-dir.x).atan2(-dir.y).to_degrees(),
    })
}

/// Position of the goal waypoint: the middle of the right hand lane at the last centerline point.
pub fn goal_position(line: &Centerline, width_m: f64) -> Result<Vector3<f64>, LaneError> {
    let points = line.points();
    let n = points.len();
    if n < 2 {
        return Err(LaneError::InsufficientPoints(n));
    }

    let last = points[n - 1];
    let extrapolated = last + (last - points[n - 2]);
    let edges = edge_offset(&last, &extrapolated, width_m).map_err(|e| with_index(e, n - 2))?;

    Ok((last + edges.right_m) * 0.5)
}

fn check_width(width_m: f64) -> Result<(), LaneError> {
    if width_m.is_finite() && width_m > 0.0 {
        Ok(())
    } else {
        Err(LaneError::InvalidWidth(width_m))
    }
}

/// Replace the segment index of a degenerate segment error.
fn with_index(err: LaneError, index: usize) -> LaneError {
    match err {
        LaneError::DegenerateSegment { .. } => LaneError::DegenerateSegment { index },
        e => e,
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Area;

    fn assert_close(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    fn straight_road() -> Centerline {
        Centerline::new(vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(100.0, 0.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_edge_offset() {
        let edges = edge_offset(
            &Vector3::new(0.0, 0.0, 2.0),
            &Vector3::new(10.0, 0.0, 5.0),
            8.0,
        )
        .unwrap();

        assert_close(&edges.left_m, &Vector3::new(0.0, 4.0, 2.0));
        assert_close(&edges.right_m, &Vector3::new(0.0, -4.0, 2.0));

        // Heading north the right edge is to the east
        let edges = edge_offset(&Vector3::zeros(), &Vector3::new(0.0, 5.0, 0.0), 2.0).unwrap();
        assert_close(&edges.right_m, &Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(
            edge_offset(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 3.0), 8.0),
            Err(LaneError::DegenerateSegment { index: 0 })
        );
        assert_eq!(
            edge_offset(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0), 0.0),
            Err(LaneError::InvalidWidth(0.0))
        );
    }

    #[test]
    fn test_edge_offset_along_x() {
        let edges = edge_offset(&Vector3::zeros(), &Vector3::new(100.0, 0.0, 0.0), 8.0).unwrap();

        assert_close(&edges.left_m, &Vector3::new(0.0, 4.0, 0.0));
        assert_close(&edges.right_m, &Vector3::new(0.0, -4.0, 0.0));
    }

    #[test]
    fn test_edge_offset_geometry() {
        let p1 = Vector3::new(3.0, -7.0, 1.5);

        for &(dx, dy) in &[(1.0, 2.0), (-5.0, 0.5), (0.3, -0.3), (-2.0, -9.0)] {
            let p2 = Vector3::new(p1.x + dx, p1.y + dy, 0.0);
            let edges = edge_offset(&p1, &p2, 6.0).unwrap();
            let dir = Vector2::new(dx, dy);

            for e in &[edges.left_m, edges.right_m] {
                let off = geom::xy(e) - geom::xy(&p1);
                assert_relative_eq!(off.norm(), 3.0, epsilon = 1e-9);
                assert_relative_eq!(off.dot(&dir), 0.0, epsilon = 1e-9);
                assert_eq!(e.z, p1.z);
            }

            // Left is anticlockwise of the direction of travel
            let left = geom::xy(&edges.left_m) - geom::xy(&p1);
            assert!(dir.x * left.y - dir.y * left.x > 0.0);
        }
    }

    #[test]
    fn test_straight_lane_polygon() {
        let poly = LanePolygon::from_centerline(&straight_road(), 8.0).unwrap();

        let expected = [
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, -4.0, 0.0),
            Vector3::new(100.0, -4.0, 0.0),
        ];

        assert_eq!(poly.ring().len(), expected.len());
        for (a, b) in poly.ring().iter().zip(expected.iter()) {
            assert_close(a, b);
        }

        assert_relative_eq!(poly.to_geo().unsigned_area(), 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lane_polygon_ring_size() {
        let line = Centerline::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(50.0, 10.0, 0.0),
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(150.0, 20.0, 0.0),
        ])
        .unwrap();

        let poly = LanePolygon::from_centerline(&line, 8.0).unwrap();
        assert_eq!(poly.ring().len(), 8);
    }

    #[test]
    fn test_tight_turn_rejected() {
        // Turning right through 180 degrees within less than the lane width
        let line = Centerline::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(20.0, 0.0, 0.0),
            Vector3::new(20.0, -1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
        ])
        .unwrap();

        assert_eq!(
            LanePolygon::from_centerline(&line, 8.0).unwrap_err(),
            LaneError::SelfIntersecting
        );
    }

    #[test]
    fn test_spawn_pose() {
        let pose = spawn_pose(&straight_road(), 8.0, 3.5).unwrap();

        assert_close(&pose.position_m, &Vector3::new(3.5, -2.0, 0.0));
        assert_relative_eq!(pose.yaw_deg, -90.0, epsilon = 1e-9);

        // Height from the higher of the first two points
        let line = Centerline::new(vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 10.0, 4.0),
        ])
        .unwrap();
        let pose = spawn_pose(&line, 8.0, 0.0).unwrap();
        assert_close(&pose.position_m, &Vector3::new(2.0, 0.0, 4.0));
        assert_relative_eq!(pose.yaw_deg.abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_goal_position() {
        let goal = goal_position(&straight_road(), 8.0).unwrap();
        assert_close(&goal, &Vector3::new(100.0, -2.0, 0.0));
    }
}
