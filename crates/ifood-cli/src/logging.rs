//! File logging for the CLI.
//!
//! Screens go to stdout, so log events are written to
//! `<IFOOD_HOME>/logs/ifood.log` instead. The filter comes from `IFOOD_LOG`.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use ifood_core::config::paths;

const DEFAULT_FILTER: &str = "ifood=info,ifood_core=info";

/// Installs the global subscriber. Returns the writer guard, which must be
/// held until exit so buffered lines are flushed.
///
/// Logging is best effort: any failure leaves the process without a
/// subscriber.
pub fn init() -> Option<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir).ok()?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("ifood")
        .filename_suffix("log")
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env("IFOOD_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;

    Some(guard)
}
