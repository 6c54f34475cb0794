//! Tracing setup for both binaries.
//!
//! The window has no terminal, so it logs to a daily rolling file. The CLI
//! logs to stderr so stdout stays clean for results.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "foodee";

/// File logging for the GUI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
/// The level can be controlled via `RUST_LOG`.
pub fn init_file_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("foodee=debug,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}", log_dir.display());
    Ok(guard)
}

/// Stderr logging for the CLI; `verbose` raises the default level to debug.
pub fn init_stderr_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "foodee=debug,warn" } else { "foodee=info,warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;

    Ok(())
}
