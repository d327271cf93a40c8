//! Configuration for a plot session
//!
//! Dimensionality is fixed when the session is created. The output format
//! is only the starting value; it can be changed on a live session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{validation, GnuplotError, GnuplotResult};
use crate::sink::DEFAULT_RELEASE_GRACE;
use crate::style::OutputFormat;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Number of coordinates per point (1, 2 or 3)
    pub dimensions: usize,
    /// Keep the gnuplot window open after the session ends (`-persist`)
    pub persist: bool,
    /// Initial output format for `save`
    pub format: OutputFormat,
    /// Leave data files on disk when they are released
    pub keep_data_files: bool,
    /// Minimum time in milliseconds a replaced data file stays on disk
    pub release_grace_ms: u64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            persist: false,
            format: OutputFormat::Png,
            keep_data_files: false,
            release_grace_ms: DEFAULT_RELEASE_GRACE.as_millis() as u64,
        }
    }
}

impl PlotConfig {
    /// Create a configuration for a plot of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    /// Keep the gnuplot window open after close
    pub fn with_persist(mut self) -> Self {
        self.persist = true;
        self
    }

    /// Set the initial output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Leave data files on disk after release
    pub fn with_keep_data_files(mut self) -> Self {
        self.keep_data_files = true;
        self
    }

    /// Set how long replaced data files are kept for gnuplot to finish reading
    pub fn with_release_grace(mut self, grace: Duration) -> Self {
        self.release_grace_ms = grace.as_millis() as u64;
        self
    }

    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> GnuplotResult<Self> {
        serde_json::from_str(json_str).map_err(|e| GnuplotError::InvalidConfig(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> GnuplotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GnuplotError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> GnuplotResult<Self> {
        toml::from_str(toml_str).map_err(|e| GnuplotError::InvalidConfig(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> GnuplotResult<String> {
        toml::to_string_pretty(self).map_err(|e| GnuplotError::InvalidConfig(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> GnuplotResult<()> {
        validation::validate_dimensions(self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimensions, 2);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.release_grace(), DEFAULT_RELEASE_GRACE);
    }

    #[test]
    fn test_builder() {
        let config = PlotConfig::new(3)
            .with_persist()
            .with_format(OutputFormat::Pdf)
            .with_keep_data_files()
            .with_release_grace(Duration::from_millis(250));
        assert_eq!(config.dimensions, 3);
        assert!(config.persist);
        assert!(config.keep_data_files);
        assert_eq!(config.format, OutputFormat::Pdf);
        assert_eq!(config.release_grace_ms, 250);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(PlotConfig::new(0).validate().is_err());
        assert!(PlotConfig::new(4).validate().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let config = PlotConfig::new(1).with_format(OutputFormat::Svg);
        let json = config.to_json().unwrap();
        let parsed = PlotConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_partial() {
        let parsed = PlotConfig::from_toml("dimensions = 3\nformat = \"pdf\"\n").unwrap();
        assert_eq!(parsed.dimensions, 3);
        assert_eq!(parsed.format, OutputFormat::Pdf);
        assert!(!parsed.persist);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PlotConfig::from_json("{ not json"),
            Err(GnuplotError::InvalidConfig(_))
        ));
    }
}
