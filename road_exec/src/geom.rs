//! # Geometry helpers
//!
//! Conversions between the `nalgebra` points used throughout the library and the `geo` types used
//! for polygon operations, plus a few planar predicates. All functions here work in the
//! horizontal (XY) plane and ignore Z.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use geo::{Coord, Intersects, Line, LineString, Polygon};
use nalgebra::{Vector2, Vector3};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Horizontal distance under which two points are considered coincident.
///
/// Units: meters
pub const COINCIDENT_EPSILON_M: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Horizontal component of a point.
pub fn xy(p: &Vector3<f64>) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

/// Horizontal distance between two points.
pub fn horizontal_dist(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (xy(b) - xy(a)).norm()
}

pub fn to_coord(p: &Vector3<f64>) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Build a polygon from a ring of points. The ring is closed automatically.
pub fn to_polygon(ring: &[Vector3<f64>]) -> Polygon<f64> {
    Polygon::new(
        LineString::new(ring.iter().map(to_coord).collect()),
        vec![],
    )
}

/// Determine whether a polyline crosses or folds back over itself.
///
/// If `closed` is true the segment joining the last point to the first is included. Adjacent
/// segments only count as intersecting when they run back along each other.
pub fn self_intersects(points: &[Vector3<f64>], closed: bool) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut segments: Vec<Line<f64>> = points
        .windows(2)
        .map(|w| Line::new(to_coord(&w[0]), to_coord(&w[1])))
        .collect();
    if closed {
        segments.push(Line::new(to_coord(&points[n - 1]), to_coord(&points[0])));
    }

    let num_segs = segments.len();

    for i in 0..num_segs {
        for j in (i + 1)..num_segs {
            let adjacent = j == i + 1 || (closed && i == 0 && j == num_segs - 1);

            if adjacent {
                // Order so that `a` ends where `b` starts
                let (a, b) = if j == i + 1 {
                    (&segments[i], &segments[j])
                } else {
                    (&segments[j], &segments[i])
                };
                if folds_back(a, b) {
                    return true;
                }
            } else if segments[i].intersects(&segments[j]) {
                return true;
            }
        }
    }

    false
}

/// True if segment `b`, which starts at the end of `a`, doubles back along `a`.
fn folds_back(a: &Line<f64>, b: &Line<f64>) -> bool {
    let da = a.delta();
    let db = b.delta();

    let cross = da.x * db.y - da.y * db.x;
    let dot = da.x * db.x + da.y * db.y;

    let scale = (da.x.hypot(da.y) * db.x.hypot(db.y)).max(std::f64::MIN_POSITIVE);

    (cross / scale).abs() < 1e-12 && dot < 0.0
}

#[cfg(test)]
mod test {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Vector3<f64>> {
        raw.iter().map(|&(x, y)| Vector3::new(x, y, 0.0)).collect()
    }

    #[test]
    fn test_self_intersects() {
        // Simple square
        let square = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(!self_intersects(&square, true));
        assert!(!self_intersects(&square, false));

        // Bow tie
        let bow = pts(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(self_intersects(&bow, true));
        assert!(self_intersects(&bow, false));

        // Straight collinear points are fine
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert!(!self_intersects(&line, false));

        // Doubling back on itself
        let hairpin = pts(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
        assert!(self_intersects(&hairpin, false));
    }

    #[test]
    fn test_to_polygon_closes_ring() {
        let poly = to_polygon(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
        let ext = poly.exterior();
        assert_eq!(ext.0.len(), 4);
        assert_eq!(ext.0.first(), ext.0.last());
    }
}
