//! Implementation of the run monitor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{fmt, sync::Arc};

use log::{debug, info, trace, warn};
use nalgebra::Vector3;

use super::{
    Clock, RunMonError, RunMonParams, TelemetryRecord, TelemetrySink, TickError, TickRecord,
};
use crate::{agent::AgentStateProvider, geom, oob::FootprintComparator, road::Road};
use util::archive::Archiver;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance applied when comparing elapsed time against the time budget.
///
/// Units: seconds
pub const TIME_EPSILON_S: f64 = 1e-9;

/// Tolerance, as a fraction of the tick interval, used when locking ticks to the interval grid.
const PHASE_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Observes one run of an agent along a road.
///
/// On every tick the monitor reads the agent's footprint, records how much of it lies outside the
/// lane, records the agent's kinematics and decides whether the run has ended.
pub struct RunMonitor<A: AgentStateProvider> {
    params: RunMonParams,

    road: Arc<Road>,

    comparator: FootprintComparator,

    agent: A,

    state: RunState,

    tm: TelemetryRecord,

    num_ticks: u64,

    arch: Option<Archiver>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of a run. Every state other than `Running` is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Running,
    GoalReached,
    TimedOut,
    Faulted(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "{}", super::tm::NOT_FINISHED),
            RunState::GoalReached => write!(f, "Goal reached"),
            RunState::TimedOut => write!(f, "Timed out"),
            RunState::Faulted(reason) => write!(f, "Faulted: {}", reason),
        }
    }
}

impl<A: AgentStateProvider> RunMonitor<A> {
    /// Create a new monitor for a run of `agent` along `road`.
    pub fn new(road: Arc<Road>, agent: A, params: RunMonParams) -> Result<Self, RunMonError> {
        if !(params.tick_interval_s > 0.0 && params.tick_interval_s.is_finite()) {
            return Err(RunMonError::InvalidParams(format!(
                "tick interval must be positive, got {}",
                params.tick_interval_s
            )));
        }
        if !(params.time_budget_s > 0.0) {
            return Err(RunMonError::InvalidParams(format!(
                "time budget must be positive, got {}",
                params.time_budget_s
            )));
        }
        if !(params.goal_distance_m >= 0.0) {
            return Err(RunMonError::InvalidParams(format!(
                "goal distance must not be negative, got {}",
                params.goal_distance_m
            )));
        }

        let comparator = FootprintComparator::new(road.lane());
        let tm = TelemetryRecord::new(&road, &params);

        Ok(Self {
            params,
            road,
            comparator,
            agent,
            state: RunState::Running,
            tm,
            num_ticks: 0,
            arch: None,
        })
    }

    /// Write one archive row per tick with the given archiver.
    pub fn with_archiver(mut self, arch: Archiver) -> Self {
        self.arch = Some(arch);
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Number of ticks performed so far.
    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    pub fn telemetry(&self) -> &TelemetryRecord {
        &self.tm
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    /// Perform one tick at `elapsed_s` seconds after the start of the run.
    ///
    /// Ticking a monitor which has already finished does nothing.
    pub fn tick(&mut self, elapsed_s: f64) -> &RunState {
        if self.state.is_terminal() {
            return &self.state;
        }

        self.num_ticks += 1;

        match self.tick_inner(elapsed_s) {
            Ok(Some(end)) => self.finish(end),
            Ok(None) => (),
            Err(e) => {
                warn!("Run faulted on tick {}: {}", self.num_ticks, e);
                self.finish(RunState::Faulted(e.to_string()));
            }
        }

        &self.state
    }

    /// Tick until the run ends, then hand the telemetry to the sink.
    ///
    /// Ticks are locked to multiples of the tick interval after the clock's start, so a slow tick
    /// does not shift every tick after it. If a tick overruns the following slots are skipped.
    pub fn run<C: Clock, S: TelemetrySink + ?Sized>(
        mut self,
        clock: &mut C,
        sink: &mut S,
    ) -> TelemetryRecord {
        let interval_s = self.params.tick_interval_s;
        let mut last_slot: u64 = 0;

        info!(
            "Starting run on \"{}\" ({:.1} s budget, {:.2} s ticks)",
            self.road.name(),
            self.params.time_budget_s,
            interval_s
        );

        while !self.state.is_terminal() {
            let now_s = clock.elapsed_s();
            let slot = (now_s / interval_s + PHASE_EPSILON).floor().max(0.0) as u64 + 1;

            if slot > last_slot + 1 {
                warn!(
                    "Tick overran, skipping {} tick slot(s)",
                    slot - last_slot - 1
                );
            }
            last_slot = slot;

            clock.sleep_s(slot as f64 * interval_s - now_s);

            self.tick(clock.elapsed_s());
        }

        let tm = self.finalise();

        if let Err(e) = sink.accept(&tm) {
            warn!("Could not hand over the telemetry of \"{}\": {}", tm.name, e);
        }

        tm
    }

    /// Consume the monitor and return its telemetry.
    pub fn finalise(self) -> TelemetryRecord {
        self.tm
    }

    fn tick_inner(&mut self, elapsed_s: f64) -> Result<Option<RunState>, TickError> {
        let footprint = self.agent.current_footprint()?;
        let oob_ratio = self.comparator.oob_ratio(&footprint)?;

        self.tm.out_of_bounds.push(oob_ratio);

        let pose = self.agent.current_pose();
        match pose {
            Some(k) => {
                self.tm.position.push(to_array(&k.position_m));
                self.tm.velocity.push(to_array(&k.velocity_ms));
            }
            None => debug!("No agent pose on tick {}", self.num_ticks),
        }

        trace!(
            "Tick {} at {:.3} s: oob {:.3}",
            self.num_ticks,
            elapsed_s,
            oob_ratio
        );

        if let Some(arch) = self.arch.as_mut() {
            let rec = TickRecord {
                tick: self.num_ticks,
                elapsed_s,
                oob_ratio,
                pos_x_m: pose.map(|k| k.position_m.x),
                pos_y_m: pose.map(|k| k.position_m.y),
                pos_z_m: pose.map(|k| k.position_m.z),
                vel_x_ms: pose.map(|k| k.velocity_ms.x),
                vel_y_ms: pose.map(|k| k.velocity_ms.y),
                vel_z_ms: pose.map(|k| k.velocity_ms.z),
            };
            if let Err(e) = arch.serialise(rec) {
                warn!("Could not archive tick {}: {}", self.num_ticks, e);
            }
        }

        if elapsed_s + TIME_EPSILON_S >= self.params.time_budget_s {
            return Ok(Some(RunState::TimedOut));
        }

        let goal_dist_m = geom::horizontal_dist(&footprint.centroid_m(), &self.road.goal_m());
        if goal_dist_m < self.params.goal_distance_m {
            return Ok(Some(RunState::GoalReached));
        }

        Ok(None)
    }

    fn finish(&mut self, end: RunState) {
        info!(
            "Run on \"{}\" finished after {} ticks: {}",
            self.road.name(),
            self.num_ticks,
            end
        );

        self.tm.success = end == RunState::GoalReached;
        self.tm.finish = end.to_string();
        self.state = end;
    }
}

fn to_array(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
