//! Tracing setup: an operational log and a dedicated mailbox-failure log.
//!
//! Events with the [`FAILURE_LOG_TARGET`] target go to the failure file;
//! everything else goes to the operational file at the configured level.

use std::fs;
use std::path::Path;

use calendar_enricher::FAILURE_LOG_TARGET;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::{ConfigError, LoggingSection};

/// Initialize the global subscriber with the two file streams.
///
/// The returned guards must stay alive for the lifetime of the process;
/// dropping them stops the non-blocking writers.
pub fn init(config: &LoggingSection) -> Result<Vec<WorkerGuard>, ConfigError> {
    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| ConfigError::LogLevel(config.level.clone()))?;

    let (operational_writer, operational_guard) = appender(&config.meetings_log)?;
    let (failure_writer, failure_guard) = appender(&config.failures_log)?;

    let operational_layer = tracing_subscriber::fmt::layer()
        .with_writer(operational_writer)
        .with_ansi(false)
        .with_filter(filter_fn(move |metadata| {
            metadata.target() != FAILURE_LOG_TARGET && *metadata.level() <= level
        }));

    let failure_layer = tracing_subscriber::fmt::layer()
        .with_writer(failure_writer)
        .with_ansi(false)
        .with_filter(filter_fn(|metadata| metadata.target() == FAILURE_LOG_TARGET));

    tracing_subscriber::registry()
        .with(operational_layer)
        .with(failure_layer)
        .init();

    Ok(vec![operational_guard, failure_guard])
}

fn appender(path: &Path) -> Result<(NonBlocking, WorkerGuard), ConfigError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| ConfigError::LogPath(path.to_path_buf()))?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}
