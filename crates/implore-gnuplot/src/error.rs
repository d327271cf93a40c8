//! Error types for implore-gnuplot
//!
//! Every failure is returned to the caller synchronously. Nothing is retried
//! and gnuplot's own diagnostic stream is never inspected, so a command that
//! gnuplot rejects is not reported here.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for plot session operations
#[derive(Error, Debug)]
pub enum GnuplotError {
    /// Data shaped for a different dimensionality than the plot
    #[error("Invalid dimensions: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Plot dimensionality outside 1..=3
    #[error("Invalid dimensions: a plot has 1, 2 or 3 dimensions, got {actual}")]
    DimensionsOutOfRange { actual: usize },

    /// A point group with this name is already plotted
    #[error("A point group named '{name}' already exists; remove it before reusing the name")]
    DuplicateName { name: String },

    /// No point group with this name
    #[error("Point group not found: {name}")]
    NotFound { name: String },

    /// Input that is not one of the supported numeric shapes or keywords
    #[error("Unsupported input: {0}")]
    UnsupportedType(String),

    /// Save requested with nothing plotted
    #[error("The plot has no point groups, there is nothing to save")]
    EmptyPlot,

    /// Output size outside the accepted range
    #[error("Invalid output size: {width}x{height} (must be positive and within limits)")]
    InvalidSize { width: u32, height: u32 },

    /// Label setter called with the wrong number of labels
    #[error("Invalid number of labels: {count} (expected 1 to 3)")]
    InvalidLabels { count: usize },

    /// Pass-through command that would split into several lines
    #[error("Command must be a single line: {0:?}")]
    MalformedCommand(String),

    /// The gnuplot executable could not be located
    #[error("Could not find '{name}' on PATH; set a custom path to gnuplot")]
    ExecutableNotFound { name: String },

    /// The executable path was already fixed for this process
    #[error("gnuplot executable already configured as {path}")]
    ExecutableAlreadyConfigured { path: PathBuf },

    /// Spawning the gnuplot process failed
    #[error("Failed to start {path}: {source}")]
    ProcessSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// gnuplot did not exit within the close deadline
    #[error("gnuplot did not exit within {0:?}")]
    ProcessTimeout(Duration),

    /// Operation on a session that has been closed
    #[error("Session is closed")]
    SessionClosed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pipe or data file I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for plot session operations
pub type GnuplotResult<T> = Result<T, GnuplotError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate an output size for `save`
    pub fn validate_size(width: u32, height: u32) -> GnuplotResult<()> {
        const MAX_DIMENSION: u32 = 16384;
        const MIN_DIMENSION: u32 = 1;

        if width < MIN_DIMENSION
            || height < MIN_DIMENSION
            || width > MAX_DIMENSION
            || height > MAX_DIMENSION
        {
            return Err(GnuplotError::InvalidSize { width, height });
        }
        Ok(())
    }

    /// Validate a plot dimensionality
    pub fn validate_dimensions(dimensions: usize) -> GnuplotResult<()> {
        if !(1..=3).contains(&dimensions) {
            return Err(GnuplotError::DimensionsOutOfRange { actual: dimensions });
        }
        Ok(())
    }

    /// Reject text that would reach gnuplot as more than one command
    pub fn validate_single_line(command: &str) -> GnuplotResult<()> {
        if command.contains(['\n', '\r']) {
            return Err(GnuplotError::MalformedCommand(command.to_string()));
        }
        Ok(())
    }
}
