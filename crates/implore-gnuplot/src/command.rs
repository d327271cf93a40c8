//! gnuplot command construction
//!
//! Pure string builders. The session decides *when* a command is sent; the
//! functions here only decide what it looks like.
//!
//! The first point group of a plot (or of a replay) is drawn with `plot`
//! (`splot` for 3-D); every later one is appended with `replot`.

use std::fmt;
use std::path::Path;

use crate::style::{OutputFormat, Style};

/// Leading keyword of a plot command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotVerb {
    Plot,
    Splot,
    Replot,
}

impl PlotVerb {
    /// Verb for a point group drawn after `active_plots` others
    pub fn for_position(dimensions: usize, active_plots: usize) -> Self {
        match (active_plots, dimensions) {
            (0, 3) => PlotVerb::Splot,
            (0, _) => PlotVerb::Plot,
            _ => PlotVerb::Replot,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotVerb::Plot => "plot",
            PlotVerb::Splot => "splot",
            PlotVerb::Replot => "replot",
        }
    }
}

impl fmt::Display for PlotVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate axis, for labels, ranges and log scales
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in label order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Quote for a gnuplot double-quoted string (backslash escapes apply)
pub fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote for a gnuplot single-quoted string (only `''` is special)
pub fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Build the command that draws one point group
///
/// Shape: `<verb> "<path>" [title "<name>"] with <style>`; the title clause
/// is omitted for an empty name.
pub fn plot_command(
    dimensions: usize,
    active_plots: usize,
    data_path: &Path,
    name: &str,
    style: Style,
) -> String {
    let verb = PlotVerb::for_position(dimensions, active_plots);
    let path = double_quoted(&data_path.to_string_lossy());
    if name.is_empty() {
        format!("{} {} with {}", verb, path, style)
    } else {
        format!("{} {} title {} with {}", verb, path, double_quoted(name), style)
    }
}

/// Commands issued by `save`, in order
pub fn save_commands(format: OutputFormat, path: &Path, width: u32, height: u32) -> [String; 3] {
    [
        format!("set terminal {} size {}, {}", format.terminal(), width, height),
        format!("set output {}", single_quoted(&path.to_string_lossy())),
        PlotVerb::Replot.to_string(),
    ]
}

pub fn title(text: &str) -> String {
    format!("set title {}", double_quoted(text))
}

pub fn label(axis: Axis, text: &str) -> String {
    format!("set {}label {}", axis.as_str(), single_quoted(text))
}

pub fn range(axis: Axis, start: f64, end: f64) -> String {
    format!("set {}range [{}:{}]", axis.as_str(), start, end)
}

pub fn log_scale(axis: Axis, base: u32) -> String {
    format!("set logscale {} {}", axis.as_str(), base)
}

pub fn grid() -> String {
    "set grid".to_string()
}

pub fn key_outside() -> String {
    "set key outside".to_string()
}
