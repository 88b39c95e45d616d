//! Logger set up for road executables.
//!
//! Records go to two sinks: stdout and the session log file. Each sink has its own level, and
//! stdout can additionally be held back per target, so that the per tick `trace!`s of the run
//! monitor stay in the log file while the terminal only shows the run summary.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logger parameters, normally loaded from `logger.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerParams {
    /// Level written to stdout.
    pub stdout_level: LevelFilter,

    /// Level written to the session log file.
    pub file_level: LevelFilter,

    /// Stdout levels for individual targets (module paths), e.g. `road_lib::run_mon`.
    ///
    /// These only apply to stdout; the log file always records at `file_level`.
    pub stdout_targets: BTreeMap<String, LevelFilter>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The {0} level must record at least `INFO`, found `{1}`")]
    InvalidMinLogLevel(&'static str, LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LoggerParams {
    fn default() -> Self {
        Self {
            stdout_level: LevelFilter::Debug,
            file_level: LevelFilter::Trace,
            stdout_targets: BTreeMap::new(),
        }
    }
}

impl LoggerParams {
    /// Check both sinks record at least `Info`, so the run summary is never lost.
    ///
    /// Per target stdout levels may be anything, including `Off`.
    pub fn validate(&self) -> Result<(), LoggerInitError> {
        if self.stdout_level < LevelFilter::Info {
            return Err(LoggerInitError::InvalidMinLogLevel("stdout", self.stdout_level));
        }
        if self.file_level < LevelFilter::Info {
            return Err(LoggerInitError::InvalidMinLogLevel("file", self.file_level));
        }

        Ok(())
    }

    /// The stdout level applied to a record from `target`.
    ///
    /// The longest configured module path prefixing `target` wins, mirroring how `fern` resolves
    /// `level_for`.
    pub fn stdout_level_for(&self, target: &str) -> LevelFilter {
        self.stdout_targets
            .iter()
            .filter(|(t, _)| {
                target == t.as_str()
                    || (target.starts_with(t.as_str()) && target[t.len()..].starts_with("::"))
            })
            .max_by_key(|(t, _)| t.len())
            .map(|(_, l)| *l)
            .unwrap_or(self.stdout_level)
    }

    /// The most verbose level either sink can accept.
    fn max_level(&self) -> LevelFilter {
        self.stdout_targets
            .values()
            .copied()
            .chain([self.stdout_level, self.file_level].iter().copied())
            .max()
            .unwrap_or(LevelFilter::Info)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - Both `stdout_level` and `file_level` must be `Info` or more verbose.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    params: &LoggerParams,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    params.validate()?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut stdout = fern::Dispatch::new().level(params.stdout_level);
    for (target, level) in params.stdout_targets.iter() {
        stdout = stdout.level_for(target.clone(), *level);
    }

    fern::Dispatch::new()
        .format(format_record)
        .level(params.max_level())
        .chain(stdout.chain(std::io::stdout()))
        .chain(fern::Dispatch::new().level(params.file_level).chain(log_file))
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Stdout level: {:?}", params.stdout_level);
    for (target, level) in params.stdout_targets.iter() {
        info!("        {}: {:?}", target, level);
    }
    info!("    File level: {:?}", params.file_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn format_record(
    out: fern::FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
) {
    // Debug and trace records also carry their target
    if record.level() > log::Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            level_to_str(record.level()),
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!(
            "[{:10.6} {}] {}",
            session::get_elapsed_seconds(),
            level_to_str(record.level()),
            message
        ))
    }
}

fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info => "INF".normal(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_keep_traces_out_of_stdout() {
        let params = LoggerParams::default();
        assert!(params.validate().is_ok());

        assert_eq!(params.stdout_level_for("road_lib::run_mon::state"), LevelFilter::Debug);
        assert_eq!(params.max_level(), LevelFilter::Trace);
    }

    #[test]
    fn test_params_file() {
        let params: LoggerParams =
            crate::params::from_str(include_str!("../../params/logger.toml")).unwrap();
        assert!(params.validate().is_ok());

        assert_eq!(params.file_level, LevelFilter::Trace);
        assert_eq!(params.stdout_level_for("road_lib::run_mon::state"), LevelFilter::Info);
        assert_eq!(params.stdout_level_for("road_lib::road"), LevelFilter::Debug);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let params: LoggerParams = crate::params::from_str(
            r#"
            stdout_level = "info"
            file_level = "trace"

            [stdout_targets]
            "road_lib" = "debug"
            "road_lib::run_mon" = "warn"
            "road_lib::run_mon::clock" = "trace"
            "#,
        )
        .unwrap();

        assert_eq!(params.stdout_level_for("road_exec"), LevelFilter::Info);
        assert_eq!(params.stdout_level_for("road_lib::map::osm"), LevelFilter::Debug);
        assert_eq!(params.stdout_level_for("road_lib::run_mon"), LevelFilter::Warn);
        assert_eq!(params.stdout_level_for("road_lib::run_mon::state"), LevelFilter::Warn);
        assert_eq!(params.stdout_level_for("road_lib::run_mon::clock"), LevelFilter::Trace);

        // Prefixes only match on module boundaries
        assert_eq!(params.stdout_level_for("road_lib_extra"), LevelFilter::Info);
    }

    #[test]
    fn test_sinks_must_record_info() {
        let mut params = LoggerParams::default();
        params.stdout_level = LevelFilter::Warn;
        assert!(matches!(
            params.validate(),
            Err(LoggerInitError::InvalidMinLogLevel("stdout", LevelFilter::Warn))
        ));

        let mut params = LoggerParams::default();
        params.file_level = LevelFilter::Off;
        assert!(matches!(
            params.validate(),
            Err(LoggerInitError::InvalidMinLogLevel("file", LevelFilter::Off))
        ));

        // Individual targets may be silenced on stdout
        let mut params = LoggerParams::default();
        params.stdout_targets.insert(String::from("road_lib::map"), LevelFilter::Off);
        assert!(params.validate().is_ok());
        assert_eq!(params.max_level(), LevelFilter::Trace);
    }
}
