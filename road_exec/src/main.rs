//! Road execution entry point.
//!
//! # Architecture
//!
//! A single execution runs one road:
//!
//!     - Load parameters
//!     - Build the road from its source:
//!         - Synthetic points, or a street from saved map data
//!         - Projection to the local frame and resampling
//!     - Check the road is valid
//!     - Write the road into the simulator's scene file
//!     - Monitor the agent's run along the road
//!     - Save and score the telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::{path::PathBuf, sync::Arc};
use structopt::StructOpt;

// Internal
use road_lib::{
    agent::{AgentStateProvider, FollowerParams, LaneFollowerAgent, ScriptedAgent},
    map::{self, ElevationSource, FlatElevation, ResponseFileElevation},
    proj::{Equirectangular, ProjParams},
    resample::ResampleParams,
    road::{Road, RoadParams, RoadSource},
    run_mon::{RunMonParams, RunMonitor, SessionSink, WallClock},
    scene, score,
};
use util::{
    archive::Archiver,
    logger::{logger_init, LoggerParams},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Session relative directory telemetry is saved into.
const RESULTS_DIR: &str = "results";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "road_exec", about = "Build a test road and monitor a run along it")]
struct Opts {
    #[structopt(subcommand)]
    source: SourceCmd,

    /// Replay agent samples from this JSON file instead of driving the lane follower.
    #[structopt(long, parse(from_os_str))]
    replay: Option<PathBuf>,

    /// Write the road into this scene file.
    #[structopt(long, parse(from_os_str))]
    scene: Option<PathBuf>,

    /// Build and check the road without running it.
    #[structopt(long)]
    dry_run: bool,
}

#[derive(Debug, StructOpt)]
enum SourceCmd {
    /// A road given as points in meters.
    #[structopt(name = "synthetic")]
    Synthetic {
        /// JSON file of the form `{"name": ..., "points": [[x, y, z], ...]}`.
        #[structopt(parse(from_os_str))]
        points: PathBuf,
    },

    /// A named street from a saved Overpass response.
    #[structopt(name = "street")]
    Street {
        /// Name of the street.
        name: String,

        /// The saved Overpass response.
        #[structopt(long, parse(from_os_str))]
        ways: PathBuf,

        /// A saved elevation service response for the street's points.
        #[structopt(long, parse(from_os_str))]
        elevation: Option<PathBuf>,

        /// Elevation used for every point when no elevation response is given.
        #[structopt(long, default_value = "0.0")]
        flat_elevation_m: f64,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session =
        Session::new("road_exec", "sessions").wrap_err("Failed to create the session")?;

    let logger_params: LoggerParams =
        util::params::load("logger.toml").wrap_err("Could not load logger params")?;
    logger_init(&logger_params, &session).wrap_err("Failed to initialise logging")?;

    info!("Road Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let proj_params: ProjParams =
        util::params::load("proj.toml").wrap_err("Could not load projection params")?;
    let resample_params: ResampleParams =
        util::params::load("resample.toml").wrap_err("Could not load resample params")?;
    let road_params: RoadParams =
        util::params::load("road.toml").wrap_err("Could not load road params")?;
    let run_params: RunMonParams =
        util::params::load("run_mon.toml").wrap_err("Could not load run monitor params")?;
    let follower_params: FollowerParams =
        util::params::load("follower.toml").wrap_err("Could not load follower params")?;

    info!("Parameters loaded");

    // ---- BUILD ROAD ----

    let source = match &opts.source {
        SourceCmd::Synthetic { points } => RoadSource::synthetic_from_file(points)
            .wrap_err("Failed to load the synthetic road")?,
        SourceCmd::Street {
            name,
            ways,
            elevation,
            flat_elevation_m,
        } => {
            let elevation: Box<dyn ElevationSource> = match elevation {
                Some(p) => Box::new(ResponseFileElevation::new(p)),
                None => Box::new(FlatElevation(*flat_elevation_m)),
            };
            map::street_source_from_file(ways, name, elevation.as_ref())
                .wrap_err("Failed to load the street")?
        }
    };

    let road = Road::build(
        &source,
        &Equirectangular::new(proj_params),
        &resample_params,
        &road_params,
    )
    .wrap_err("Failed to build the road")?;

    road.validate(&road_params.validity)
        .wrap_err("The road is not valid")?;

    let spawn = road
        .spawn_pose(road_params.spawn_offset_m)
        .wrap_err("Failed to find the spawn pose")?;
    info!(
        "Spawn at ({:.2}, {:.2}, {:.2}) heading {:.1} deg",
        spawn.position_m.x, spawn.position_m.y, spawn.position_m.z, spawn.yaw_deg
    );

    if let Some(path) = &opts.scene {
        scene::write_scene_file(&road, path).wrap_err("Failed to write the scene")?;
    }

    if opts.dry_run {
        info!("Dry run, not running the road");
        session.exit();
        return Ok(());
    }

    // ---- RUN ----

    let road = Arc::new(road);

    let agent: Box<dyn AgentStateProvider> = match &opts.replay {
        Some(path) => {
            Box::new(ScriptedAgent::from_file(path).wrap_err("Failed to load the replay")?)
        }
        None => Box::new(
            LaneFollowerAgent::new(
                &road,
                follower_params,
                road_params.spawn_offset_m,
                run_params.tick_interval_s,
            )
            .wrap_err("Failed to create the lane follower")?,
        ),
    };

    let archive_ticks = run_params.archive_ticks;
    let mut monitor =
        RunMonitor::new(road, agent, run_params).wrap_err("Failed to create the run monitor")?;

    if archive_ticks {
        match Archiver::from_path(&session, "run_mon.csv") {
            Ok(a) => monitor = monitor.with_archiver(a),
            Err(e) => warn!("Tick archive disabled: {}", e),
        }
    }

    let mut sink = SessionSink::new(&session, RESULTS_DIR);
    let tm = monitor.run(&mut WallClock::start(), &mut sink);

    info!("Run finished: {}", tm.finish);
    info!("Out of bounds score: {:.3}", score::oob_score(&tm));

    // ---- SHUTDOWN ----

    session.exit();

    info!("End of execution");

    Ok(())
}
