//! Default configuration values

/// Radius in meters of an analysis probe when none is specified.
pub const DEFAULT_ANALYSIS_RADIUS_M: f64 = 2000.0;

/// Seconds to wait for a dataset loader before marking the layer failed.
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 10;

/// Directory holding the CSV/GeoJSON dataset files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log filename.
pub const DEFAULT_LOG_FILE: &str = "civiclayer.log";
