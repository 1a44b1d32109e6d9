//! Application configuration
//!
//! Settings are pure data with `Default` impls backed by the named
//! constants in [`defaults`]. There is no config-file parser here; the CLI
//! maps its arguments onto [`Settings`] directly.

mod defaults;
mod settings;

pub use defaults::{
    DEFAULT_ANALYSIS_RADIUS_M, DEFAULT_DATA_DIR, DEFAULT_LOAD_TIMEOUT_SECS, DEFAULT_LOG_DIR,
    DEFAULT_LOG_FILE,
};
pub use settings::{LoggingSettings, Settings};
