//! # Centerline resampler
//!
//! Densifies a centerline by fitting an interpolating curve through its points and sampling it at
//! evenly spaced parameter values. The curve parameter is the cumulative chord length normalised
//! to [0, 1], so the samples are denser where the input points are.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod spline;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector3;
use util::maths::linspace;

use crate::road::{Centerline, CenterlineError};
pub use params::{ResampleParams, SplineDegree};
use spline::AxisSpline;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ResampleError {
    #[error("At least 2 points are needed to fit a curve, {0} were given")]
    InsufficientPoints(usize),

    #[error("Density must be at least 1, got {0}")]
    InvalidDensity(usize),

    #[error("Smoothing must be in [0, 1), got {0}")]
    InvalidSmoothing(f64),

    #[error("Segment {index} has zero length")]
    ZeroLengthSegment { index: usize },

    #[error("The resampled points do not form a valid centerline: {0}")]
    InvalidOutput(CenterlineError),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Resample a centerline according to the given parameters.
pub fn resample(line: &Centerline, params: &ResampleParams) -> Result<Centerline, ResampleError> {
    let points = resample_points(line.points(), params)?;

    Centerline::new(points).map_err(ResampleError::InvalidOutput)
}

/// Resample a raw sequence of points.
///
/// Returns `params.density * points.len()` points. The first and last output points equal the
/// first and last inputs (after smoothing, which never moves the end points).
pub fn resample_points(
    points: &[Vector3<f64>],
    params: &ResampleParams,
) -> Result<Vec<Vector3<f64>>, ResampleError> {
    if points.len() < 2 {
        return Err(ResampleError::InsufficientPoints(points.len()));
    }
    if params.density < 1 {
        return Err(ResampleError::InvalidDensity(params.density));
    }
    if !(0.0..1.0).contains(&params.smoothing) {
        return Err(ResampleError::InvalidSmoothing(params.smoothing));
    }

    let smoothed = smooth(points, params.smoothing);
    let knots = chord_params(&smoothed)?;

    let sx = fit_axis(&knots, smoothed.iter().map(|p| p.x).collect(), params.degree);
    let sy = fit_axis(&knots, smoothed.iter().map(|p| p.y).collect(), params.degree);
    let sz = fit_axis(&knots, smoothed.iter().map(|p| p.z).collect(), params.degree);

    let num_out = params.density * points.len();

    debug!(
        "Resampling {} points to {} with {:?} curve (smoothing {})",
        points.len(),
        num_out,
        params.degree,
        params.smoothing
    );

    Ok(linspace(0.0, 1.0, num_out)
        .into_iter()
        .map(|t| Vector3::new(sx.eval(t), sy.eval(t), sz.eval(t)))
        .collect())
}

fn fit_axis(knots: &[f64], values: Vec<f64>, degree: SplineDegree) -> AxisSpline<'_> {
    match degree {
        SplineDegree::Linear => AxisSpline::linear(knots, values),
        SplineDegree::Cubic => AxisSpline::natural_cubic(knots, values),
    }
}

/// Apply one Laplacian smoothing pass to the interior points.
fn smooth(points: &[Vector3<f64>], factor: f64) -> Vec<Vector3<f64>> {
    if factor == 0.0 || points.len() < 3 {
        return points.to_vec();
    }

    let mut out = points.to_vec();
    for i in 1..(points.len() - 1) {
        let neighbours = (points[i - 1] + points[i + 1]) * 0.5;
        out[i] = points[i] * (1.0 - factor) + neighbours * factor;
    }

    out
}

/// Cumulative chord length of each point, normalised to [0, 1].
fn chord_params(points: &[Vector3<f64>]) -> Result<Vec<f64>, ResampleError> {
    let mut knots = Vec::with_capacity(points.len());
    knots.push(0.0);

    let mut total = 0.0;
    for (index, w) in points.windows(2).enumerate() {
        let len = (w[1] - w[0]).norm();
        if len <= 0.0 {
            return Err(ResampleError::ZeroLengthSegment { index });
        }
        total += len;
        knots.push(total);
    }

    for k in knots.iter_mut() {
        *k /= total;
    }

    // Guard the last knot against rounding so sampling at 1.0 hits the end point
    if let Some(last) = knots.last_mut() {
        *last = 1.0;
    }

    Ok(knots)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
