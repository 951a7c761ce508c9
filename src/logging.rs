// Logging init: file under the local data dir, or stderr fallback.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,rbxstats_fetcher=debug";

pub fn log_file_path() -> Result<PathBuf> {
    let dir = dirs::data_local_dir().context("no local data directory")?;
    Ok(dir.join("rbxstats-fetcher").join("fetcher.log"))
}

/// Initialize structured logging to `<data_local_dir>/rbxstats-fetcher/fetcher.log`.
/// Returns Err when the log file cannot be opened so the caller can fall back.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log dir {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("logging initialized at {}", path.display());
    Ok(path)
}

/// Stderr-only logging. Defaults to `warn` so the interactive menu stays
/// readable.
pub fn init_logging_stderr() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
