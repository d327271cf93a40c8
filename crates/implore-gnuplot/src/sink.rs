//! Temporary data files read by gnuplot
//!
//! Every materialization writes a fresh file, one record per line with
//! space separated coordinates. Files are never updated in place.
//!
//! Sinks belong to a generation. A replay retires the live generation;
//! retired generations are released by a later replay once they are older
//! than the grace period. gnuplot reads commands asynchronously, so a queued
//! `replot` may still refer to files the session no longer tracks as live.

use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::{Builder, NamedTempFile};

use crate::error::GnuplotResult;
use crate::series::PointData;

/// File name prefix for every data file
pub const SINK_PREFIX: &str = "implore-gnuplot-";

/// Minimum time a retired data file stays on disk
pub const DEFAULT_RELEASE_GRACE: Duration = Duration::from_secs(5);

/// Identifier of a materialized data file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u64);

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink-{}", self.0)
    }
}

/// A materialized data file
#[derive(Debug)]
pub struct Sink {
    id: SinkId,
    records: usize,
    file: NamedTempFile,
}

impl Sink {
    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Path gnuplot reads the data from
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of records written
    pub fn records(&self) -> usize {
        self.records
    }

    /// Close the handle; the file is deleted unless `keep` is set
    fn release(self, keep: bool) {
        if keep {
            if let Err(e) = self.file.keep() {
                tracing::warn!("Failed to keep data file {}: {}", self.id, e);
            }
        } else if let Err(e) = self.file.close() {
            tracing::warn!("Failed to remove data file {}: {}", self.id, e);
        }
    }
}

/// Write one record per point into `writer`
pub fn write_records<W: Write>(writer: &mut W, points: &PointData) -> std::io::Result<usize> {
    let mut count = 0;
    for record in points.records() {
        let mut first = true;
        for value in record {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{}", value)?;
            first = false;
        }
        writer.write_all(b"\n")?;
        count += 1;
    }
    Ok(count)
}

/// Sinks retired together by one replay
#[derive(Debug)]
struct Generation {
    retired_at: Instant,
    sinks: Vec<Sink>,
}

/// Owns every data file created by a session
#[derive(Debug)]
pub struct SinkRegistry {
    dir: PathBuf,
    keep_files: bool,
    grace: Duration,
    next_id: u64,
    live: Vec<Sink>,
    retired: Vec<Generation>,
}

impl SinkRegistry {
    /// Registry writing into the OS temp directory
    pub fn new(keep_files: bool) -> Self {
        Self::in_dir(std::env::temp_dir(), keep_files)
    }

    /// Registry writing into `dir`
    pub fn in_dir(dir: impl Into<PathBuf>, keep_files: bool) -> Self {
        Self {
            dir: dir.into(),
            keep_files,
            grace: DEFAULT_RELEASE_GRACE,
            next_id: 0,
            live: Vec::new(),
            retired: Vec::new(),
        }
    }

    /// Set the minimum age of a retired generation before it is released
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `points` to a new data file and track it
    pub fn materialize(&mut self, points: &PointData) -> GnuplotResult<&Sink> {
        let mut file = Builder::new().prefix(SINK_PREFIX).tempfile_in(&self.dir)?;
        let records = {
            let mut writer = BufWriter::new(file.as_file_mut());
            let records = write_records(&mut writer, points)?;
            writer.flush()?;
            records
        };

        let id = SinkId(self.next_id);
        self.next_id += 1;
        tracing::trace!("Materialized {} at {:?} ({} records)", id, file.path(), records);

        self.live.push(Sink { id, records, file });
        Ok(&self.live[self.live.len() - 1])
    }

    /// Retire the live sinks and release generations older than the grace
    pub fn retire_all(&mut self) {
        let keep = self.keep_files;
        let grace = self.grace;
        let (expired, kept): (Vec<Generation>, Vec<Generation>) = std::mem::take(&mut self.retired)
            .into_iter()
            .partition(|generation| generation.retired_at.elapsed() >= grace);
        self.retired = kept;
        for sink in expired.into_iter().flat_map(|generation| generation.sinks) {
            sink.release(keep);
        }

        let sinks = std::mem::take(&mut self.live);
        if !sinks.is_empty() {
            self.retired.push(Generation {
                retired_at: Instant::now(),
                sinks,
            });
        }
    }

    /// Close and forget every tracked sink
    pub fn release_all(&mut self) {
        let keep = self.keep_files;
        let retired = self.retired.drain(..).flat_map(|generation| generation.sinks);
        for sink in retired.chain(self.live.drain(..)) {
            sink.release(keep);
        }
    }

    pub fn get(&self, id: SinkId) -> Option<&Sink> {
        self.live
            .iter()
            .chain(self.retired.iter().flat_map(|generation| generation.sinks.iter()))
            .find(|s| s.id == id)
    }

    /// Sinks referenced by the current plot
    pub fn live(&self) -> impl Iterator<Item = &Sink> {
        self.live.iter()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live plus retired sinks
    pub fn tracked_count(&self) -> usize {
        self.live.len()
            + self
                .retired
                .iter()
                .map(|generation| generation.sinks.len())
                .sum::<usize>()
    }
}

impl Drop for SinkRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
