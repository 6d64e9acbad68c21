//! Process invocation seam for cluster tools.
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use std::process::Command;
use std::time::Instant;

const SUMMARY_MAX_BYTES: usize = 240;

/// One external invocation plus the form that is safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub argv: Vec<String>,
    pub display: String,
}

impl CommandLine {
    pub fn new(argv: Vec<String>) -> Self {
        let display = shell_words::join(&argv);
        Self { argv, display }
    }

    /// Use when argv carries secret values; only `display` is ever logged.
    pub fn redacted(argv: Vec<String>, display: String) -> Self {
        Self { argv, display }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// First non-empty output line, for one-line error summaries.
    pub fn summary(&self) -> String {
        let line = self
            .output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty());
        match (line, self.status) {
            (Some(line), _) => truncate_string(line, SUMMARY_MAX_BYTES),
            (None, Some(code)) => format!("exit status {code}"),
            (None, None) => "terminated by signal".to_string(),
        }
    }
}

/// Runs one command to completion. Errors mean the process could not be
/// started; a non-zero exit is reported through [`CommandOutput`].
pub trait CommandRunner {
    fn run(&mut self, command: &CommandLine) -> Result<CommandOutput>;
}

/// Blocking runner backed by `std::process`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &CommandLine) -> Result<CommandOutput> {
        let (program, args) = command
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("command is empty"))?;
        tracing::debug!(command = %command.display, "running");
        let start = Instant::now();
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("spawn {program}"))?;
        let elapsed_ms = start.elapsed().as_millis();

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let status = output.status.code();
        tracing::info!(
            elapsed_ms,
            status = ?status,
            output_bytes = combined.len(),
            command = %command.display,
            "command complete"
        );
        tracing::debug!(output = %combined.trim_end(), "command output");
        Ok(CommandOutput {
            status,
            output: combined,
        })
    }
}
