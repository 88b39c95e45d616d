//! # Road
//!
//! A road is a named centerline with a fixed width. Building a road projects and resamples its
//! source points, then derives the lane polygon and goal position used while monitoring a run.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod centerline;
mod params;
mod source;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::PathBuf;

use log::{debug, info};
use nalgebra::Vector3;

use crate::{
    lane::{self, LaneError, LanePolygon, Pose},
    proj::{ProjError, Projection},
    resample::{self, ResampleError, ResampleParams},
};

pub use centerline::{Centerline, CenterlineError};
pub use params::{RoadParams, ValidityParams};
pub use source::RoadSource;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Road {
    name: String,

    width_m: f64,

    centerline: Centerline,

    lane: LanePolygon,

    goal_m: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RoadError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot read road file {0:?}: {1}")]
    LoadError(PathBuf, std::io::Error),

    #[error("Cannot parse road file {0:?}: {1}")]
    ParseError(PathBuf, serde_json::Error),

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjError),

    #[error("Invalid centerline: {0}")]
    Centerline(CenterlineError),

    #[error("Resampling failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("Invalid lane geometry: {0}")]
    Lane(#[from] LaneError),

    #[error("Road is {length_m:.1} m long, shorter than the minimum of {min_m} m")]
    TooShort { length_m: f64, min_m: f64 },

    #[error("Road is {length_m:.1} m long, longer than the maximum of {max_m} m")]
    TooLong { length_m: f64, max_m: f64 },

    #[error("The road centerline crosses itself")]
    SelfIntersecting,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Road {
    /// Create a road from an already prepared centerline.
    pub fn new(name: &str, centerline: Centerline, width_m: f64) -> Result<Self, RoadError> {
        let lane = LanePolygon::from_centerline(&centerline, width_m)?;
        let goal_m = lane::goal_position(&centerline, width_m)?;

        Ok(Self {
            name: name.to_string(),
            width_m,
            centerline,
            lane,
            goal_m,
        })
    }

    /// Build a road from a source, projecting and resampling its points.
    pub fn build(
        source: &RoadSource,
        proj: &dyn Projection,
        resample_params: &ResampleParams,
        road_params: &RoadParams,
    ) -> Result<Self, RoadError> {
        let raw = source.centerline(proj)?;
        let centerline = resample::resample(&raw, resample_params)?;

        let road = Self::new(source.name(), centerline, road_params.width_m)?;

        info!(
            "Built road \"{}\": {} points, {:.1} m",
            road.name,
            road.n_points(),
            road.length_m()
        );

        Ok(road)
    }

    /// Check that the road can be driven.
    ///
    /// The centerline must not cross itself and its length must lie within the limits.
    pub fn validate(&self, params: &ValidityParams) -> Result<(), RoadError> {
        let length_m = self.length_m();

        if length_m < params.min_length_m {
            return Err(RoadError::TooShort {
                length_m,
                min_m: params.min_length_m,
            });
        }
        if length_m > params.max_length_m {
            return Err(RoadError::TooLong {
                length_m,
                max_m: params.max_length_m,
            });
        }
        if self.centerline.self_intersects() {
            return Err(RoadError::SelfIntersecting);
        }

        debug!("Road \"{}\" is valid", self.name);

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn centerline(&self) -> &Centerline {
        &self.centerline
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        self.centerline.points()
    }

    pub fn n_points(&self) -> usize {
        self.centerline.len()
    }

    /// Units: meters
    pub fn length_m(&self) -> f64 {
        self.centerline.length_m()
    }

    pub fn lane(&self) -> &LanePolygon {
        &self.lane
    }

    /// Middle of the right hand lane at the end of the road.
    pub fn goal_m(&self) -> Vector3<f64> {
        self.goal_m
    }

    pub fn spawn_pose(&self, offset_m: f64) -> Result<Pose, LaneError> {
        lane::spawn_pose(&self.centerline, self.width_m, offset_m)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::proj::{Equirectangular, ProjParams};
    use approx::assert_relative_eq;

    fn straight(length_m: f64) -> Centerline {
        Centerline::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(length_m, 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_new() {
        let road = Road::new("straight", straight(100.0), 8.0).unwrap();

        assert_eq!(road.name(), "straight");
        assert_eq!(road.n_points(), 2);
        assert_relative_eq!(road.length_m(), 100.0);
        assert_eq!(road.lane().ring().len(), 4);
        assert!((road.goal_m() - Vector3::new(100.0, -2.0, 0.0)).norm() < 1e-9);

        assert!(matches!(
            Road::new("narrow", straight(100.0), -1.0),
            Err(RoadError::Lane(LaneError::InvalidWidth(_)))
        ));
    }

    #[test]
    fn test_build() {
        let source = RoadSource::Synthetic {
            name: "built".into(),
            points_m: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(60.0, 0.0, 0.0),
                Vector3::new(120.0, 0.0, 0.0),
            ],
        };

        let road = Road::build(
            &source,
            &Equirectangular::new(ProjParams::default()),
            &ResampleParams {
                density: 3,
                ..Default::default()
            },
            &RoadParams::default(),
        )
        .unwrap();

        assert_eq!(road.n_points(), 9);
        assert_relative_eq!(road.length_m(), 120.0, epsilon = 1e-9);
        assert!(road.validate(&ValidityParams::default()).is_ok());
    }

    #[test]
    fn test_validate() {
        let params = ValidityParams::default();

        let short = Road::new("short", straight(50.0), 8.0).unwrap();
        assert!(matches!(
            short.validate(&params),
            Err(RoadError::TooShort { .. })
        ));

        let long = Road::new("long", straight(2500.0), 8.0).unwrap();
        assert!(matches!(long.validate(&params), Err(RoadError::TooLong { .. })));

        // A figure of eight: the left turn keeps the lane polygon simple but the centerline
        // crosses itself
        let crossing = Centerline::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(100.0, 0.0, 0.0),
            Vector3::new(100.0, 100.0, 0.0),
            Vector3::new(50.0, 100.0, 0.0),
            Vector3::new(50.0, -100.0, 0.0),
        ])
        .unwrap();
        let crossing = Road {
            name: "crossing".into(),
            width_m: 8.0,
            lane: LanePolygon::from_centerline(&straight(100.0), 8.0).unwrap(),
            goal_m: Vector3::zeros(),
            centerline: crossing,
        };
        assert!(matches!(
            crossing.validate(&params),
            Err(RoadError::SelfIntersecting)
        ));
    }

    #[test]
    fn test_sharp_corner() {
        let corner = |turn_deg: f64| {
            let turn = turn_deg.to_radians();
            let mut points_m: Vec<Vector3<f64>> = (0..=10)
                .map(|i| Vector3::new(5.0 * i as f64, 0.0, 0.0))
                .collect();
            points_m.extend((1..=10).map(|j| {
                let s = 5.0 * j as f64;
                Vector3::new(50.0 + s * turn.cos(), -s * turn.sin(), 0.0)
            }));
            RoadSource::Synthetic {
                name: "corner".into(),
                points_m,
            }
        };
        let proj = Equirectangular::new(ProjParams::default());
        let build = |source: &RoadSource, density: usize| {
            Road::build(
                source,
                &proj,
                &ResampleParams {
                    density,
                    ..Default::default()
                },
                &RoadParams::default(),
            )
        };

        // An 80 degree right turn fits at 5 m spacing but not once resampled more densely
        let sharp = corner(80.0);
        assert!(build(&sharp, 1).is_ok());
        for density in 3..=4 {
            assert!(matches!(
                build(&sharp, density),
                Err(RoadError::Lane(LaneError::SelfIntersecting))
            ));
        }

        // Beyond a right angle no spacing fits
        let hairpin = corner(100.0);
        for density in 1..=4 {
            assert!(matches!(
                build(&hairpin, density),
                Err(RoadError::Lane(LaneError::SelfIntersecting))
            ));
        }
    }

    #[test]
    fn test_spawn_pose() {
        let road = Road::new("straight", straight(100.0), 8.0).unwrap();
        let pose = road.spawn_pose(3.5).unwrap();

        assert!((pose.position_m - Vector3::new(3.5, -2.0, 0.0)).norm() < 1e-9);
    }
}
