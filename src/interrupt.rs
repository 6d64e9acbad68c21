//! Ctrl+C handling.
//!
//! On interrupt the terminal is taken out of raw mode, the recorded answers
//! are written out, and the process exits with [`INTERRUPTED_EXIT_CODE`].
//! Cluster state is left as it is.
use crate::error::INTERRUPTED_EXIT_CODE;
use crate::prompts::{restore_terminal, SharedResponses};
use anyhow::{Context, Result};
use std::thread;

/// Start a listener thread that owns its own single-threaded runtime.
pub fn install(responses: SharedResponses) -> Result<()> {
    thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            if let Err(err) = wait_for_ctrlc() {
                tracing::debug!(error = %err, "interrupt listener stopped");
                return;
            }
            println!();
            tracing::warn!("bootstrap interrupted by operator");
            shut_down(&responses);
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
        .context("spawn interrupt listener")?;
    Ok(())
}

/// Cleanup that must happen before exiting, since exit skips destructors.
fn shut_down(responses: &SharedResponses) {
    if let Err(err) = restore_terminal() {
        tracing::error!(error = %err, "failed to restore terminal mode");
    }
    match responses.lock() {
        Ok(mut responses) => {
            if let Err(err) = responses.persist() {
                tracing::error!(error = %err, "failed to write response file");
            }
        }
        Err(_) => tracing::error!("response file lock poisoned; answers not saved"),
    }
}

fn wait_for_ctrlc() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build runtime for Ctrl+C listener")?;
    runtime.block_on(async {
        tokio::signal::ctrl_c()
            .await
            .context("wait for Ctrl+C")
    })
}
