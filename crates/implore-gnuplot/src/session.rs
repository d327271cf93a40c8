//! Plot session state machine
//!
//! A session owns one gnuplot process and keeps it consistent with the set
//! of point groups registered in memory:
//!
//! - `add` materializes the new group and appends it with `plot`/`replot`
//! - `remove` and `reset_style` redraw the remaining groups from scratch,
//!   because gnuplot cannot drop a single curve from a plot
//! - `close` ends the process and clears all state; every later operation
//!   fails with [`GnuplotError::SessionClosed`]
//!
//! A session is not safe for concurrent use; wrap it in a mutex if several
//! threads need to drive the same plot.

use std::path::Path;
use std::time::Duration;

use crate::backend::{GnuplotProcess, PlotBackend};
use crate::command::{self, Axis};
use crate::config::PlotConfig;
use crate::error::{validation, GnuplotError, GnuplotResult};
use crate::executable;
use crate::series::{Series, SeriesData, SeriesStore};
use crate::sink::SinkRegistry;
use crate::style::{OutputFormat, Style};

/// Lifecycle state of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Process running, accepting commands
    Ready,
    /// Process ended; terminal
    Closed,
}

/// A live connection to a gnuplot process and the point groups it shows
#[derive(Debug)]
pub struct PlotSession<B: PlotBackend = GnuplotProcess> {
    dimensions: usize,
    active_plots: usize,
    format: OutputFormat,
    state: SessionState,
    series: SeriesStore,
    sinks: SinkRegistry,
    backend: B,
}

impl PlotSession<GnuplotProcess> {
    /// Start gnuplot and create a session around it
    ///
    /// The executable comes from [`executable::resolve`].
    pub fn new(config: PlotConfig) -> GnuplotResult<Self> {
        config.validate()?;
        let path = executable::resolve()?;
        let process = GnuplotProcess::spawn(path, config.persist)?;
        Self::with_backend(config, process)
    }
}

impl<B: PlotBackend> PlotSession<B> {
    /// Create a session that sends its commands to `backend`
    pub fn with_backend(config: PlotConfig, backend: B) -> GnuplotResult<Self> {
        config.validate()?;
        Ok(Self {
            dimensions: config.dimensions,
            active_plots: 0,
            format: config.format,
            state: SessionState::Ready,
            series: SeriesStore::new(config.dimensions),
            sinks: SinkRegistry::new(config.keep_data_files).with_grace(config.release_grace()),
            backend,
        })
    }

    /// Same as [`with_backend`](Self::with_backend), with data files written into `dir`
    pub fn with_backend_in(
        config: PlotConfig,
        backend: B,
        dir: impl AsRef<Path>,
    ) -> GnuplotResult<Self> {
        let mut session = Self::with_backend(config.clone(), backend)?;
        session.sinks = SinkRegistry::in_dir(dir.as_ref(), config.keep_data_files)
            .with_grace(config.release_grace());
        Ok(session)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of point groups drawn since the last redraw
    pub fn active_plot_count(&self) -> usize {
        self.active_plots
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    /// Names of the plotted point groups, in redraw order
    pub fn series_names(&self) -> Vec<&str> {
        self.series.names()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn style(&self, name: &str) -> GnuplotResult<Style> {
        self.series.style(name)
    }

    /// Data files referenced by the current plot
    pub fn sinks(&self) -> &SinkRegistry {
        &self.sinks
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn ensure_open(&self) -> GnuplotResult<()> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Closed => Err(GnuplotError::SessionClosed),
        }
    }

    /// Send one line straight to gnuplot
    fn send(&mut self, line: &str) -> GnuplotResult<()> {
        self.backend.send_line(line)
    }

    /// Materialize `series` and append it to the plot
    fn draw(&mut self, series: &Series) -> GnuplotResult<()> {
        let sink = self.sinks.materialize(series.points())?;
        let line = command::plot_command(
            self.dimensions,
            self.active_plots,
            sink.path(),
            series.name(),
            series.style(),
        );
        self.send(&line)?;
        self.active_plots += 1;
        Ok(())
    }

    /// Redraw every registered point group from scratch
    fn replay(&mut self) -> GnuplotResult<()> {
        self.active_plots = 0;
        self.sinks.retire_all();
        let series: Vec<Series> = self.series.iter().cloned().collect();
        tracing::debug!("Replaying {} point group(s)", series.len());
        for s in &series {
            self.draw(s)?;
        }
        Ok(())
    }

    /// Add a named point group and draw it
    ///
    /// Fails without sending anything if the name is taken or the data does
    /// not match the session's dimensionality.
    pub fn add(
        &mut self,
        name: &str,
        style: Style,
        data: impl Into<SeriesData>,
    ) -> GnuplotResult<()> {
        self.ensure_open()?;
        let series = self.series.prepare(name, style, data.into())?;
        self.draw(&series)?;
        self.series.insert(series)
    }

    /// Plot `y = f(x)` sampled at `xs` (2-D sessions)
    pub fn add_func_2d<F>(&mut self, name: &str, style: Style, xs: &[f64], f: F) -> GnuplotResult<()>
    where
        F: Fn(f64) -> f64,
    {
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        self.add(name, style, [xs.to_vec(), ys])
    }

    /// Plot `z = f(x, y)` sampled pairwise at `xs` and `ys` (3-D sessions)
    ///
    /// Pairs beyond the shorter of the two inputs are ignored.
    pub fn add_func_3d<F>(
        &mut self,
        name: &str,
        style: Style,
        xs: &[f64],
        ys: &[f64],
        f: F,
    ) -> GnuplotResult<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        let n = xs.len().min(ys.len());
        let zs: Vec<f64> = xs.iter().zip(ys).map(|(&x, &y)| f(x, y)).collect();
        self.add(name, style, [xs[..n].to_vec(), ys[..n].to_vec(), zs])
    }

    /// Remove a point group and redraw the rest
    ///
    /// Removing an absent name still redraws the plot.
    pub fn remove(&mut self, name: &str) -> GnuplotResult<()> {
        self.ensure_open()?;
        if self.series.remove(name).is_none() {
            tracing::debug!("Point group '{}' not present, redrawing anyway", name);
        }
        self.replay()
    }

    /// Change the style of a point group
    ///
    /// The group moves to the end of the redraw order with the new style and
    /// the whole plot is redrawn. It stays registered if a write fails.
    pub fn reset_style(&mut self, name: &str, style: Style) -> GnuplotResult<()> {
        self.ensure_open()?;
        let mut series = self.series.remove(name).ok_or_else(|| GnuplotError::NotFound {
            name: name.to_string(),
        })?;
        series.set_style(style);
        self.series.insert(series)?;
        self.replay()
    }

    /// Set the format used by later saves
    pub fn set_format(&mut self, format: OutputFormat) -> GnuplotResult<()> {
        self.ensure_open()?;
        self.format = format;
        Ok(())
    }

    /// Render the current plot to `path`
    ///
    /// Only the write to gnuplot is checked, not the file it produces.
    pub fn save(&mut self, path: impl AsRef<Path>, width: u32, height: u32) -> GnuplotResult<()> {
        self.ensure_open()?;
        if self.active_plots == 0 {
            return Err(GnuplotError::EmptyPlot);
        }
        validation::validate_size(width, height)?;
        let commands = command::save_commands(self.format, path.as_ref(), width, height);
        for line in &commands {
            validation::validate_single_line(line)?;
        }
        for line in &commands {
            self.send(line)?;
        }
        Ok(())
    }

    /// Send an arbitrary single-line command
    pub fn raw_command(&mut self, text: &str) -> GnuplotResult<()> {
        self.ensure_open()?;
        validation::validate_single_line(text)?;
        self.send(text)
    }

    pub fn set_title(&mut self, title: &str) -> GnuplotResult<()> {
        self.raw_command(&command::title(title))
    }

    pub fn set_x_label(&mut self, label: &str) -> GnuplotResult<()> {
        self.raw_command(&command::label(Axis::X, label))
    }

    pub fn set_y_label(&mut self, label: &str) -> GnuplotResult<()> {
        self.raw_command(&command::label(Axis::Y, label))
    }

    pub fn set_z_label(&mut self, label: &str) -> GnuplotResult<()> {
        self.raw_command(&command::label(Axis::Z, label))
    }

    /// Set x, y and z labels in order; between one and three labels
    pub fn set_labels(&mut self, labels: &[&str]) -> GnuplotResult<()> {
        self.ensure_open()?;
        if labels.is_empty() || labels.len() > Axis::ALL.len() {
            return Err(GnuplotError::InvalidLabels {
                count: labels.len(),
            });
        }
        for (axis, label) in Axis::ALL.iter().zip(labels) {
            self.raw_command(&command::label(*axis, label))?;
        }
        Ok(())
    }

    pub fn set_x_range(&mut self, start: f64, end: f64) -> GnuplotResult<()> {
        self.raw_command(&command::range(Axis::X, start, end))
    }

    pub fn set_y_range(&mut self, start: f64, end: f64) -> GnuplotResult<()> {
        self.raw_command(&command::range(Axis::Y, start, end))
    }

    pub fn set_z_range(&mut self, start: f64, end: f64) -> GnuplotResult<()> {
        self.raw_command(&command::range(Axis::Z, start, end))
    }

    pub fn set_log_scale(&mut self, axis: Axis, base: u32) -> GnuplotResult<()> {
        self.raw_command(&command::log_scale(axis, base))
    }

    pub fn set_grid(&mut self) -> GnuplotResult<()> {
        self.raw_command(&command::grid())
    }

    pub fn set_key_outside(&mut self) -> GnuplotResult<()> {
        self.raw_command(&command::key_outside())
    }

    /// Close the command stream, wait for gnuplot to exit and clear all state
    ///
    /// Blocks until the process exits. Calling it again is a no-op.
    pub fn close(&mut self) -> GnuplotResult<()> {
        if self.is_closed() {
            return Ok(());
        }
        let result = self.backend.close();
        self.clear();
        result
    }

    /// Like [`close`](Self::close), but kill gnuplot if it has not exited
    /// within `timeout`
    pub fn close_timeout(&mut self, timeout: Duration) -> GnuplotResult<()> {
        if self.is_closed() {
            return Ok(());
        }
        let result = self.backend.close_timeout(timeout);
        self.clear();
        result
    }

    fn clear(&mut self) {
        self.state = SessionState::Closed;
        self.sinks.release_all();
        self.series.clear();
        self.active_plots = 0;
    }
}

impl<B: PlotBackend> Drop for PlotSession<B> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close plot session: {}", e);
        }
    }
}
