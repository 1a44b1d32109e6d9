//! Settings structs
//!
//! These are pure data types with no parsing or serialization logic.

use super::defaults;
use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the dataset files referenced by the layer manifest
    pub data_dir: PathBuf,
    /// Default analysis probe radius in meters
    pub analysis_radius_m: f64,
    /// How long a dataset load may run before the layer is marked failed
    pub load_timeout: Duration,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DEFAULT_DATA_DIR),
            analysis_radius_m: defaults::DEFAULT_ANALYSIS_RADIUS_M,
            load_timeout: Duration::from_secs(defaults::DEFAULT_LOAD_TIMEOUT_SECS),
            logging: LoggingSettings::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log filename
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::DEFAULT_LOG_DIR),
            file_name: defaults::DEFAULT_LOG_FILE.to_string(),
        }
    }
}
