//! Run monitor parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for monitoring a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunMonParams {
    /// Period between two ticks.
    ///
    /// Units: seconds
    pub tick_interval_s: f64,

    /// Time after which the run is stopped if the goal has not been reached.
    ///
    /// Units: seconds
    pub time_budget_s: f64,

    /// Horizontal distance from the goal at which the agent is considered to have arrived.
    ///
    /// Units: meters
    pub goal_distance_m: f64,

    /// Speed limit the agent was asked to respect, recorded in the telemetry.
    ///
    /// Units: meters/second
    pub speed_limit_ms: f64,

    /// Risk value the agent was configured with, recorded in the telemetry.
    pub risk_value: f64,

    /// Write a CSV archive row for every tick.
    pub archive_ticks: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RunMonParams {
    fn default() -> Self {
        Self {
            tick_interval_s: 0.1,
            time_budget_s: 300.0,
            goal_distance_m: 8.0,
            // 30 mph
            speed_limit_ms: 13.4112,
            risk_value: 0.5,
            archive_ticks: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_param_file() {
        let params: RunMonParams =
            util::params::from_str(include_str!("../../../params/run_mon.toml")).unwrap();

        assert_eq!(params.tick_interval_s, 0.1);
        assert_eq!(params.goal_distance_m, 8.0);
        assert_eq!(params.speed_limit_ms, 13.4112);
    }
}
