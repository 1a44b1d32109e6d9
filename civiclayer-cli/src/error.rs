//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use civiclayer::layer::ManifestError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Layer manifest was invalid
    Manifest(ManifestError),
    /// No layer with the given id exists
    UnknownLayer(String),
    /// A layer dataset failed to load
    LoadFailed { layer: String, reason: String },
    /// Probe coordinates were out of range
    InvalidCoordinates(String),
    /// The manifest carries no analysis layer
    NoAnalysisLayer,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::LoadFailed { .. } => {
                eprintln!();
                eprintln!("Check that --data-dir points at the dataset directory and");
                eprintln!("that the layer's file exists (see `civiclayer layers`).");
            }
            CliError::UnknownLayer(_) => {
                eprintln!();
                eprintln!("Run `civiclayer layers` to list available layer ids.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Manifest(e) => write!(f, "Invalid layer manifest: {}", e),
            CliError::UnknownLayer(id) => write!(f, "No layer with id '{}'", id),
            CliError::LoadFailed { layer, reason } => {
                write!(f, "Failed to load layer '{}': {}", layer, reason)
            }
            CliError::InvalidCoordinates(msg) => write!(f, "Invalid probe position: {}", msg),
            CliError::NoAnalysisLayer => write!(f, "Manifest has no analysis layer"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Manifest(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        CliError::Manifest(e)
    }
}
