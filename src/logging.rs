use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The terminal belongs to the UI, so events go to a file instead.
fn log_dir() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .or_else(dirs::config_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory for logs"))?
        .join("reelfeed")
        .join("logs");

    fs::create_dir_all(&dir).with_context(|| format!("Failed to create log dir {:?}", dir))?;
    Ok(dir)
}

/// Installs the global subscriber. Keep the guard alive until exit or the
/// last buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir()?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, "reelfeed.log"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelfeed=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
