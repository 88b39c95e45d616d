//! # Road execution library.
//!
//! Builds simulator test roads from synthetic points or map data and monitors an agent driving
//! along them, recording how far it strays out of its lane.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Agent state providers - supply the agent's footprint and kinematics each tick
pub mod agent;

/// Planar geometry helpers shared by the other modules
pub mod geom;

/// Lane geometry - road edges, the lane polygon, spawn pose and goal position
pub mod lane;

/// Map data - street geometry and elevations from saved map service responses
pub mod map;

/// Out of bounds comparator - how much of the agent's footprint is outside the lane
pub mod oob;

/// Projection - geodetic points to the local metric frame
pub mod proj;

/// Resampler - densifies centerlines along an interpolating curve
pub mod resample;

/// Road - centerline, width and derived lane geometry
pub mod road;

/// Run monitor - ticks through a run and records its telemetry
pub mod run_mon;

/// Scene emitter - writes roads into the simulator's scene file
pub mod scene;

/// Scoring of finished runs
pub mod score;
