//! Shared helpers for session integration tests

use std::path::PathBuf;
use std::time::Duration;

use implore_gnuplot::{PlotConfig, PlotSession, RecordingBackend};
use tempfile::TempDir;

/// A session over a recorder, writing data files into `dir`
///
/// Replaced data files are released on the next redraw.
pub fn recording_session(dimensions: usize, dir: &TempDir) -> PlotSession<RecordingBackend> {
    PlotSession::with_backend_in(
        PlotConfig::new(dimensions).with_release_grace(Duration::ZERO),
        RecordingBackend::new(),
        dir.path(),
    )
    .expect("valid session config")
}

/// Leading keyword of a command line
#[allow(dead_code)]
pub fn verb(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// Data file path quoted in a plot command
pub fn data_path(line: &str) -> PathBuf {
    let start = line.find('"').expect("quoted path") + 1;
    let end = start + line[start..].find('"').expect("closing quote");
    PathBuf::from(&line[start..end])
}

/// Title quoted in a plot command, if any
#[allow(dead_code)]
pub fn title(line: &str) -> Option<&str> {
    let rest = &line[line.find(" title \"")? + " title \"".len()..];
    Some(&rest[..rest.find('"')?])
}
