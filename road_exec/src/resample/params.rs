//! Resampler parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters of the centerline resampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleParams {
    /// Output points per input point. An input of N points produces `density * N` points.
    pub density: usize,

    /// Degree of the interpolating curve.
    pub degree: SplineDegree,

    /// Smoothing factor in [0, 1). Zero interpolates the input points exactly.
    pub smoothing: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineDegree {
    /// Piecewise linear interpolation
    Linear,

    /// Natural cubic interpolation
    Cubic,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for ResampleParams {
    fn default() -> Self {
        Self {
            density: 2,
            degree: SplineDegree::Linear,
            smoothing: 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_degree_names() {
        let params: ResampleParams =
            util::params::from_str("density = 3\ndegree = \"cubic\"").unwrap();

        assert_eq!(params.density, 3);
        assert_eq!(params.degree, SplineDegree::Cubic);
        assert_eq!(params.smoothing, 0.0);

        assert!(util::params::from_str::<ResampleParams>("degree = \"quintic\"").is_err());
    }
}
