//! Logging configuration using the tracing framework
//!
//! Logs are filtered through the RUST_LOG environment variable.
//! The command line logs to stderr so that printed tables stay clean,
//! while the interactive UI logs to a rolling file to keep the terminal
//! free for drawing.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "cra=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize console logging on stderr
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level (e.g., "debug", "info", "warn", "error")
///   - Default: "cra=info,warn"
///   - Examples:
///     - `RUST_LOG=debug` - Show all debug logs
///     - `RUST_LOG=cra::holidays=debug` - Debug logs for the holiday client only
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

/// Initialize logging to a daily rolling file
///
/// The file lives in the platform data directory under `logs/`, or in the
/// current directory when no data directory can be resolved.
///
/// # Examples
///
/// ```no_run
/// use cra::logging;
///
/// logging::init_with_file("cra.log").expect("Failed to initialize logging");
/// tracing::info!("Interactive session started");
/// ```
pub fn init_with_file(log_file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let log_dir = if let Some(proj_dirs) = crate::config::project_dirs() {
        let log_path = proj_dirs.data_dir().join("logs");
        std::fs::create_dir_all(&log_path)?;
        log_path
    } else {
        std::env::current_dir()?
    };

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_file_name);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

/// Initialize logging for tests
///
/// Only errors are shown by default.
pub fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_reentrant() {
        init_test();
        init_test();
    }

    #[test]
    fn test_structured_logging() {
        init_test();
        tracing::info!(year = 2024, month = 5, "Structured log message");
    }
}
