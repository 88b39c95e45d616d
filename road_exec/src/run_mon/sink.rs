//! Destinations for finished run telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use log::info;
use util::session::Session;

use super::TelemetryRecord;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Accepts the telemetry of a finished run.
pub trait TelemetrySink {
    fn accept(&mut self, tm: &TelemetryRecord) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Saves telemetry as `{dir}/{road name}.json` inside the session directory.
pub struct SessionSink<'a> {
    session: &'a Session,
    dir: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Cannot derive a file name from the road name {0:?}")]
    InvalidName(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'a> SessionSink<'a> {
    pub fn new<P: Into<PathBuf>>(session: &'a Session, dir: P) -> Self {
        Self {
            session,
            dir: dir.into(),
        }
    }
}

impl TelemetrySink for SessionSink<'_> {
    fn accept(&mut self, tm: &TelemetryRecord) -> Result<(), SinkError> {
        let path = self.dir.join(format!("{}.json", file_stem(&tm.name)?));

        info!("Saving telemetry to {:?}", self.session.session_root.join(&path));
        self.session.save(path, tm.clone());

        Ok(())
    }
}

/// Keeps every record in memory.
impl TelemetrySink for Vec<TelemetryRecord> {
    fn accept(&mut self, tm: &TelemetryRecord) -> Result<(), SinkError> {
        self.push(tm.clone());
        Ok(())
    }
}

/// File name for a road, with path separators replaced.
fn file_stem(name: &str) -> Result<String, SinkError> {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        Err(SinkError::InvalidName(name.to_string()))
    } else {
        Ok(stem)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("GA road 3-4").unwrap(), "GA road 3-4");
        assert_eq!(file_stem("a/b\\c").unwrap(), "a_b_c");
        assert!(file_stem("  ").is_err());
        assert!(file_stem("..").is_err());
    }
}
