//! Road centerline polyline

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::Serialize;

use crate::geom;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An ordered sequence of points in the local metric frame describing the middle of the road.
///
/// A centerline always has at least two points and no two consecutive points share the same
/// horizontal position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Centerline {
    points_m: Vec<Vector3<f64>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CenterlineError {
    #[error("A centerline needs at least 2 points, {0} were given")]
    InsufficientPoints(usize),

    #[error("Segment {index} has zero horizontal length")]
    DegenerateSegment { index: usize },

    #[error("Point {0} has a non-finite coordinate")]
    NonFinite(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Centerline {
    /// Create a new centerline, rejecting any consecutive pair of horizontally coincident points.
    pub fn new(points_m: Vec<Vector3<f64>>) -> Result<Self, CenterlineError> {
        if points_m.len() < 2 {
            return Err(CenterlineError::InsufficientPoints(points_m.len()));
        }

        for (i, p) in points_m.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(CenterlineError::NonFinite(i));
            }
        }

        for (index, w) in points_m.windows(2).enumerate() {
            if geom::horizontal_dist(&w[0], &w[1]) < geom::COINCIDENT_EPSILON_M {
                return Err(CenterlineError::DegenerateSegment { index });
            }
        }

        Ok(Self { points_m })
    }

    /// Create a new centerline, dropping points which coincide horizontally with the point before
    /// them.
    ///
    /// Map data frequently repeats the node joining two ways, this removes those repeats.
    pub fn new_dedup(points_m: Vec<Vector3<f64>>) -> Result<Self, CenterlineError> {
        let mut deduped: Vec<Vector3<f64>> = Vec::with_capacity(points_m.len());

        for p in points_m {
            match deduped.last() {
                Some(last) if geom::horizontal_dist(last, &p) < geom::COINCIDENT_EPSILON_M => (),
                _ => deduped.push(p),
            }
        }

        Self::new(deduped)
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points_m
    }

    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    /// Always false, a centerline has at least two points.
    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Length of the centerline measured in the horizontal plane.
    ///
    /// Units: meters
    pub fn length_m(&self) -> f64 {
        self.points_m
            .windows(2)
            .map(|w| geom::horizontal_dist(&w[0], &w[1]))
            .sum()
    }

    /// Determine whether the centerline crosses itself.
    pub fn self_intersects(&self) -> bool {
        geom::self_intersects(&self.points_m, false)
    }

    pub fn into_points(self) -> Vec<Vector3<f64>> {
        self.points_m
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
