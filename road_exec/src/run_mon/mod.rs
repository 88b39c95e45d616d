//! # Run monitor
//!
//! Monitors a single run of an agent along a road. The monitor ticks at a fixed interval; on
//! each tick it measures how far the agent is out of its lane and records the agent's kinematics.
//! The run ends when the agent reaches the goal, the time budget runs out, or the agent's state
//! cannot be read, after which the telemetry is handed to a [`TelemetrySink`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod clock;
mod params;
mod sink;
mod state;
mod tm;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{agent::AgentError, oob::OobError};

pub use clock::*;
pub use params::*;
pub use sink::*;
pub use state::*;
pub use tm::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RunMonError {
    #[error("Invalid run monitor parameters: {0}")]
    InvalidParams(String),
}

/// Failures within a single tick. Any of these ends the run as faulted.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("Could not read the agent's footprint: {0}")]
    Agent(#[from] AgentError),

    #[error("Could not compare the footprint with the lane: {0}")]
    Oob(#[from] OobError),
}
