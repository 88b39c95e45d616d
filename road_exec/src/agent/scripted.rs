//! Replay of recorded agent samples

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{collections::VecDeque, fs, path::Path};

use log::debug;
use sim_if::agent::AgentSample;

use super::{AgentError, AgentKinematics, AgentStateProvider};
use crate::oob::Footprint;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Replays a fixed list of samples, one per tick.
///
/// Once every sample has been used the agent reports itself as disconnected.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    samples: VecDeque<AgentSample>,

    current: Option<AgentSample>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ScriptedAgent {
    pub fn new(samples: Vec<AgentSample>) -> Self {
        Self {
            samples: samples.into(),
            current: None,
        }
    }

    /// Load samples from a JSON array of `{"bbox": {...}, "state": {...}}` objects.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AgentError> {
        let s = fs::read_to_string(path.as_ref())
            .map_err(|e| AgentError::LoadError(path.as_ref().to_path_buf(), e))?;

        let samples: Vec<AgentSample> = serde_json::from_str(&s)?;

        debug!("Loaded {} agent samples", samples.len());

        Ok(Self::new(samples))
    }

    /// Number of samples not yet replayed.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl AgentStateProvider for ScriptedAgent {
    fn current_footprint(&mut self) -> Result<Footprint, AgentError> {
        let sample = self.samples.pop_front();
        self.current = sample;

        let sample = sample.ok_or(AgentError::Disconnected)?;

        sample
            .bbox
            .map(Footprint::from)
            .ok_or_else(|| AgentError::ExternalUnavailable(String::from("no bounding box")))
    }

    fn current_pose(&mut self) -> Option<AgentKinematics> {
        self.current
            .and_then(|s| s.state)
            .map(AgentKinematics::from)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;
    use sim_if::agent::{AgentBbox, AgentState};

    fn bbox() -> AgentBbox {
        AgentBbox {
            front_bottom_left: [2.0, 1.0, 0.0],
            front_bottom_right: [2.0, -1.0, 0.0],
            rear_bottom_right: [-2.0, -1.0, 0.0],
            rear_bottom_left: [-2.0, 1.0, 0.0],
        }
    }

    #[test]
    fn test_replay() {
        let mut agent = ScriptedAgent::new(vec![
            AgentSample {
                bbox: Some(bbox()),
                state: Some(AgentState {
                    pos: [1.0, 2.0, 3.0],
                    vel: [4.0, 0.0, 0.0],
                }),
            },
            AgentSample {
                bbox: Some(bbox()),
                state: None,
            },
            AgentSample {
                bbox: None,
                state: None,
            },
        ]);

        // Nothing before the first footprint
        assert_eq!(agent.current_pose(), None);

        assert!(agent.current_footprint().is_ok());
        let pose = agent.current_pose().unwrap();
        assert_eq!(pose.position_m, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.velocity_ms, Vector3::new(4.0, 0.0, 0.0));

        assert!(agent.current_footprint().is_ok());
        assert_eq!(agent.current_pose(), None);

        assert!(matches!(
            agent.current_footprint(),
            Err(AgentError::ExternalUnavailable(_))
        ));

        assert_eq!(agent.remaining(), 0);
        assert!(matches!(
            agent.current_footprint(),
            Err(AgentError::Disconnected)
        ));
        assert_eq!(agent.current_pose(), None);
    }
}
