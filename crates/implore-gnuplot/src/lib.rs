//! implore-gnuplot - Stateful gnuplot driver for implore
//!
//! This crate keeps one long-lived gnuplot process in step with an in-memory
//! set of named point groups. Adding a group appends it to the plot;
//! removing or restyling one redraws the whole scene, since gnuplot has no
//! way to drop a single curve.
//!
//! # Key Components
//!
//! - **Series**: named, styled numeric data widened to `f64`
//! - **Sink**: the temporary data file gnuplot reads a series from
//! - **Command**: `plot`/`splot`/`replot` and `set ...` line builders
//! - **Backend**: the gnuplot process, or an in-memory recorder
//! - **Session**: the state machine tying the above together
//!
//! # Example
//!
//! ```no_run
//! use implore_gnuplot::{PlotConfig, PlotSession, Style};
//!
//! let mut plot = PlotSession::new(PlotConfig::new(2))?;
//! plot.set_title("Rates")?;
//! plot.add("measured", Style::Points, [vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 8.0]])?;
//! plot.save("rates.png", 800, 600)?;
//! plot.close()?;
//! # Ok::<(), implore_gnuplot::GnuplotError>(())
//! ```

pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod executable;
pub mod series;
pub mod session;
pub mod sink;
pub mod style;

pub use backend::{GnuplotProcess, PlotBackend, RecordingBackend};
pub use command::{Axis, PlotVerb};
pub use config::PlotConfig;
pub use error::{GnuplotError, GnuplotResult};
pub use series::{NumericVec, PointData, Series, SeriesData, SeriesStore};
pub use session::{PlotSession, SessionState};
pub use sink::{Sink, SinkId, SinkRegistry};
pub use style::{OutputFormat, Style};
