//! Password entry on the controlling terminal.
//!
//! Keys are read in raw mode so nothing is echoed. Raw mode also stops the
//! terminal from turning Ctrl+C into SIGINT, so the key is mapped to
//! [`BootstrapError::Interrupted`] here and raw mode is left on the way out.
use crate::error::BootstrapError;
use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use std::io::IsTerminal;

/// Raw mode held for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(error = %err, "failed to leave raw mode");
        }
    }
}

pub(crate) fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}

/// Read one masked line from the terminal.
pub(crate) fn read_password() -> Result<String> {
    let _raw = RawMode::enable()?;
    collect(|| loop {
        if let Event::Key(key) = event::read().context("read key")? {
            return Ok(key);
        }
    })
}

/// Leave raw mode if a password prompt was cut short.
pub(crate) fn restore_terminal() -> Result<()> {
    if is_raw_mode_enabled().context("query raw mode")? {
        disable_raw_mode().context("disable raw mode")?;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Push(char),
    Pop,
    Done,
    Interrupt,
    Closed,
    Ignore,
}

fn edit_for(key: KeyEvent) -> Edit {
    if key.kind != KeyEventKind::Press {
        return Edit::Ignore;
    }
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if control => Edit::Interrupt,
        KeyCode::Char('d') if control => Edit::Closed,
        KeyCode::Char(ch) if !control => Edit::Push(ch),
        KeyCode::Backspace => Edit::Pop,
        KeyCode::Enter => Edit::Done,
        _ => Edit::Ignore,
    }
}

fn collect(mut next_key: impl FnMut() -> Result<KeyEvent>) -> Result<String> {
    let mut secret = String::new();
    loop {
        match edit_for(next_key()?) {
            Edit::Push(ch) => secret.push(ch),
            Edit::Pop => {
                secret.pop();
            }
            Edit::Done => return Ok(secret),
            Edit::Interrupt => return Err(BootstrapError::Interrupted.into()),
            Edit::Closed => return Err(anyhow!("input closed while waiting for an answer")),
            Edit::Ignore => {}
        }
    }
}
