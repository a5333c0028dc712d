use std::sync::OnceLock;

use tracing::{Level, Metadata};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Directory the rolling log files are written to, relative to the working directory.
pub const LOG_DIR: &str = "logs";

/// Installs console and daily-rolling file logging.
///
/// `base_level` is an `EnvFilter` directive used when `RUST_LOG` is not set,
/// e.g. `"info"` or `"skyrender=debug"`. `file_prefix` names the log files.
pub fn setup_logging(base_level: &str, file_prefix: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    std::fs::create_dir_all(LOG_DIR)
        .unwrap_or_else(|e| panic!("Failed to create logs directory: {}", e));

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(file_prefix)
        .filename_suffix("log")
        .max_log_files(5)
        .build(LOG_DIR)
        .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD.set(guard).expect("Logging already initialized");

    let console_writer = std::io::stdout.and(std::io::stderr.with_filter(goes_to_stderr));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

/// Warnings and errors are echoed to stderr on top of stdout.
fn goes_to_stderr(metadata: &Metadata<'_>) -> bool {
    is_stderr_level(metadata.level())
}

fn is_stderr_level(level: &Level) -> bool {
    *level <= Level::WARN
}

/// Console-only logging for tests and short-lived tools. Safe to call repeatedly.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_warnings_and_errors_reach_stderr() {
        assert!(is_stderr_level(&Level::ERROR));
        assert!(is_stderr_level(&Level::WARN));
        assert!(!is_stderr_level(&Level::INFO));
        assert!(!is_stderr_level(&Level::DEBUG));
        assert!(!is_stderr_level(&Level::TRACE));
    }
}
