//! Tracing subscriber setup.
//!
//! Console output for development, daily-rolling files (optionally as
//! JSON lines) once a log directory exists.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the console logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Install the global subscriber, preferring file output when available.
///
/// Level resolution: `RUST_LOG` wins, then `log_level`, then `info`.
/// When `log_dir` points at an existing directory, output goes to a
/// daily-rolling file there (JSON lines unless `json` is `Some(false)`);
/// otherwise a plain console subscriber is installed.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "storefront-server");
            if json.unwrap_or(true) {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .json()
                    .with_writer(file_appender)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .init();
            }
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
