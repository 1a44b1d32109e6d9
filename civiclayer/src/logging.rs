//! Logging infrastructure for CivicLayer.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `logs/civiclayer.log` (cleared on session start)
//! - Also prints to stderr so CLI output stays clean on stdout
//! - Configurable via RUST_LOG environment variable

use crate::config::LoggingSettings;
use std::fs;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Creates the log directory if needed, clears the previous log file, and
/// sets up dual output to both file and stderr. The env filter defaults to
/// INFO when RUST_LOG is not set.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(&settings.directory)?;

    // Clear the previous session's log
    let log_path = settings.directory.join(&settings.file_name);
    fs::write(&log_path, "")?;

    let file_appender =
        tracing_appender::rolling::never(&settings.directory, &settings.file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // Testing actual log output requires integration tests because tracing
    // uses a global subscriber that can only be set once per process. The
    // tests below verify the file operations only.

    #[test]
    fn test_log_file_cleared_on_init_path() {
        let dir = tempfile::tempdir().unwrap();
        let log_file: PathBuf = dir.path().join("test.log");

        fs::write(&log_file, "old session data").unwrap();
        fs::write(&log_file, "").unwrap();

        assert_eq!(fs::read_to_string(&log_file).unwrap(), "");
    }

    #[test]
    fn test_nested_log_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("logs");

        fs::create_dir_all(&nested).unwrap();
        assert!(nested.exists());
    }
}
