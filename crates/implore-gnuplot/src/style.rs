//! Plot styles and output formats
//!
//! A [`Style`] is the `with <style>` clause of a plot command. An
//! [`OutputFormat`] selects the gnuplot terminal used by `save`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GnuplotError;

/// Rendering style for a point group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Lines,
    #[default]
    Points,
    LinesPoints,
    Impulses,
    Dots,
    Steps,
    Boxes,
    Histograms,
    Circles,
    ErrorBars,
    BoxErrorBars,
    FillSolid,
}

impl Style {
    /// Every style, in declaration order
    pub const ALL: [Style; 12] = [
        Style::Lines,
        Style::Points,
        Style::LinesPoints,
        Style::Impulses,
        Style::Dots,
        Style::Steps,
        Style::Boxes,
        Style::Histograms,
        Style::Circles,
        Style::ErrorBars,
        Style::BoxErrorBars,
        Style::FillSolid,
    ];

    /// The gnuplot keyword for this style
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Lines => "lines",
            Style::Points => "points",
            Style::LinesPoints => "linespoints",
            Style::Impulses => "impulses",
            Style::Dots => "dots",
            Style::Steps => "steps",
            Style::Boxes => "boxes",
            Style::Histograms => "histograms",
            Style::Circles => "circles",
            Style::ErrorBars => "errorbars",
            Style::BoxErrorBars => "boxerrorbars",
            Style::FillSolid => "boxes fill solid",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = GnuplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "lines" | "l" => Ok(Style::Lines),
            "points" | "p" => Ok(Style::Points),
            "linespoints" | "linepoints" | "lp" => Ok(Style::LinesPoints),
            "impulses" => Ok(Style::Impulses),
            "dots" => Ok(Style::Dots),
            "steps" => Ok(Style::Steps),
            "boxes" | "bar" => Ok(Style::Boxes),
            "histograms" | "histogram" => Ok(Style::Histograms),
            "circles" | "circle" => Ok(Style::Circles),
            "errorbars" => Ok(Style::ErrorBars),
            "boxerrorbars" => Ok(Style::BoxErrorBars),
            "boxes fill solid" | "fillsolid" | "fill solid" => Ok(Style::FillSolid),
            _ => Err(GnuplotError::UnsupportedType(format!("unknown style '{}'", s))),
        }
    }
}

/// Output format used when saving a plot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG raster image
    #[default]
    Png,
    /// PDF vector format
    Pdf,
    /// SVG scalable vector graphics
    Svg,
    /// JPEG raster image
    Jpeg,
    /// EPS (Encapsulated PostScript) for LaTeX
    Eps,
}

impl OutputFormat {
    /// The gnuplot terminal that produces this format
    pub fn terminal(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Eps => "postscript eps",
        }
    }

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Eps => "eps",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = GnuplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "eps" => Ok(OutputFormat::Eps),
            _ => Err(GnuplotError::UnsupportedType(format!(
                "unknown output format '{}'",
                s
            ))),
        }
    }
}
