//! Logging Infrastructure
//!
//! `RUST_LOG` takes precedence; otherwise `LOG_LEVEL` is applied to this crate
//! and to tower_http request tracing.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the env filter used by the subscriber
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "order_server={level},tower_http={level},security={level}",
            level = log_level
        ))
    })
}

/// Initialize the logger with optional daily rolling file output
///
/// Console output is always on; with a valid `log_dir` the same events are
/// also written to the rolling file. Returns the appender guard; dropping it
/// flushes and stops the file writer, so the caller must hold it for the
/// lifetime of the process.
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) if Path::new(dir).is_dir() => {
            let file_appender = tracing_appender::rolling::daily(dir, "order-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(dir) => {
            eprintln!("LOG_DIR {dir} does not exist, logging to stdout only");
            (None, None)
        }
        None => (None, None),
    };

    // Option<Layer> 为 None 时不产生任何输出
    let result = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if result.is_err() {
        tracing::warn!("Logger already initialized");
    }
    guard
}
