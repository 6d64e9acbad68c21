//! Session logging.
//!
//! Every run writes a debug-level log file under the log directory. The
//! console only shows warnings and errors unless `RUST_LOG` says otherwise.
use crate::error::BootstrapError;
use crate::util::now_epoch_ms;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("k8s-bootstrap")
        .join("logs")
}

/// Create the log directory, refusing an existing non-directory path.
pub fn prepare_log_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(BootstrapError::Config(format!(
            "{} is not a directory and cannot be used as a log directory",
            dir.display()
        ))
        .into());
    }
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))
}

pub fn session_log_path(dir: &Path, epoch_ms: u128) -> PathBuf {
    dir.join(format!("bootstrap-{epoch_ms}.log"))
}

/// Install the global subscriber and return the session log path.
pub fn init(dir: &Path) -> Result<PathBuf> {
    prepare_log_dir(dir)?;
    let path = session_log_path(dir, now_epoch_ms());
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG);
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("install log subscriber")?;
    tracing::info!(path = %path.display(), "session log opened");
    Ok(path)
}
