//! # Agent state providers
//!
//! The run monitor reads the agent's footprint and kinematics once per tick through the
//! [`AgentStateProvider`] trait. Providers here either replay recorded simulator samples or drive
//! a simple kinematic vehicle along the lane.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod follower;
mod scripted;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::PathBuf;

use nalgebra::Vector3;
use sim_if::agent::AgentState;

use crate::{lane::LaneError, oob::Footprint};
pub use follower::{FollowerParams, LaneFollowerAgent};
pub use scripted::ScriptedAgent;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of the agent's state at the current instant.
///
/// `current_footprint` is called once at the start of every tick and may advance the provider to
/// the next instant. `current_pose` then reports the kinematics for that same instant.
pub trait AgentStateProvider {
    fn current_footprint(&mut self) -> Result<Footprint, AgentError>;

    /// Position and velocity of the agent, `None` if they are not available this tick.
    fn current_pose(&mut self) -> Option<AgentKinematics>;
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentKinematics {
    pub position_m: Vector3<f64>,
    pub velocity_ms: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Agent state unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("The agent has disconnected")]
    Disconnected,

    #[error("Cannot read agent samples from {0:?}: {1}")]
    LoadError(PathBuf, std::io::Error),

    #[error("Cannot parse agent samples: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Cannot build the agent's path: {0}")]
    PathError(#[from] LaneError),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl From<AgentState> for AgentKinematics {
    fn from(state: AgentState) -> Self {
        Self {
            position_m: Vector3::from(state.pos),
            velocity_ms: Vector3::from(state.vel),
        }
    }
}

impl<A: AgentStateProvider + ?Sized> AgentStateProvider for Box<A> {
    fn current_footprint(&mut self) -> Result<Footprint, AgentError> {
        (**self).current_footprint()
    }

    fn current_pose(&mut self) -> Option<AgentKinematics> {
        (**self).current_pose()
    }
}
