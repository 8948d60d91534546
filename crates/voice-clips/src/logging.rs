use crate::{AppResult, config::LoggingConfig};

use std::fs;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "voice-clips.log";

/// Install the global subscriber writing to a daily rolling file.
///
/// `RUST_LOG` overrides the configured filter. Logs go to a file so they
/// never interleave with the console front end. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub(crate) fn init(config: &LoggingConfig) -> AppResult<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!(log_dir = ?config.log_dir, "Logging initialized");

    Ok(guard)
}
