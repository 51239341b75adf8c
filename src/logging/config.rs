//! Logging configuration
//!
//! Per-component log levels and output destinations for the measurement
//! pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for daily-rolling JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in logs
    pub include_file_location: bool,

    /// Level for the boundary detector
    pub detection_level: String,

    /// Level for pipeline orchestration
    pub pipeline_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
            detection_level: "info".to_string(),
            pipeline_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Verbose console logging plus JSON files under `logs/`
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
            detection_level: "trace".to_string(),
            pipeline_level: "debug".to_string(),
        }
    }

    /// Warnings only, file output
    pub fn production() -> Self {
        Self {
            global_level: "warn".to_string(),
            console_output: false,
            log_directory: Some(PathBuf::from("/var/log/boundary-measure")),
            include_file_location: false,
            detection_level: "info".to_string(),
            pipeline_level: "info".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (field, level) in [
            ("global_level", &self.global_level),
            ("detection_level", &self.detection_level),
            ("pipeline_level", &self.pipeline_level),
        ] {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!(
                    "Invalid {}: {}. Must be one of: {:?}",
                    field, level, VALID_LEVELS
                ));
            }
        }
        Ok(())
    }

    /// `EnvFilter` directives: the crate at the global level, with per-module
    /// overrides for detection and pipeline.
    pub fn filter_directives(&self) -> String {
        let krate = env!("CARGO_PKG_NAME").replace('-', "_");
        format!(
            "{krate}={},{krate}::detection={},{krate}::pipeline={}",
            self.global_level, self.detection_level, self.pipeline_level
        )
    }
}
