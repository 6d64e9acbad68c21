//! Operator prompts backed by a terminal, a response file, or both.
//!
//! `prompt` mode asks on the terminal, `headless` replays a response file and
//! falls back to each question's default, and `record` asks on the terminal
//! while saving every answer so a later headless run can replay it.
mod masked;

pub(crate) use masked::restore_terminal;

use crate::error::BootstrapError;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(ValueEnum, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    #[default]
    Prompt,
    Headless,
    Record,
}

/// Question-and-answer seam used by every component that needs operator input.
pub trait Prompt {
    fn confirm(&mut self, question: &str, default: bool, key: &str) -> Result<bool>;
    fn text(&mut self, question: &str, default: &str, masked: bool, key: &str) -> Result<String>;
    fn choose(&mut self, question: &str, choices: &[String], key: &str) -> Result<String>;
}

/// Answers keyed by question key, stored as a JSON object.
#[derive(Debug, Default)]
pub struct ResponseFile {
    path: Option<PathBuf>,
    answers: BTreeMap<String, Value>,
    dirty: bool,
}

pub type SharedResponses = Arc<Mutex<ResponseFile>>;

impl ResponseFile {
    pub fn empty(path: Option<PathBuf>) -> Self {
        Self {
            path,
            answers: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("read response file {}", path.display()))?;
        let answers: BTreeMap<String, Value> = serde_json::from_slice(&bytes)
            .map_err(|err| BootstrapError::Config(format!("{}: {err}", path.display())))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            answers,
            dirty: false,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.answers.get(key)
    }

    pub fn record(&mut self, key: &str, value: Value) {
        self.answers.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Write recorded answers back to disk; a no-op when nothing changed.
    pub fn persist(&mut self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(&self.answers).context("serialize responses")?;
        fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
        self.dirty = false;
        tracing::info!(path = %path.display(), answers = self.answers.len(), "response file written");
        Ok(())
    }
}

/// Check that the mode and response file flags fit together.
pub fn validate_mode(mode: PromptMode, response_file: Option<&Path>) -> Result<(), BootstrapError> {
    match (mode, response_file) {
        (PromptMode::Prompt, Some(_)) => Err(BootstrapError::Config(
            "--response-file is only used with --mode headless or --mode record".to_string(),
        )),
        (PromptMode::Headless | PromptMode::Record, None) => Err(BootstrapError::Config(
            "--response-file is required for headless and record modes".to_string(),
        )),
        (PromptMode::Headless, Some(path)) if !path.is_file() => Err(BootstrapError::Config(
            format!("response file {} does not exist", path.display()),
        )),
        _ => Ok(()),
    }
}

/// Open the response store for a session.
pub fn open_responses(mode: PromptMode, response_file: Option<&Path>) -> Result<SharedResponses> {
    let responses = match (mode, response_file) {
        (PromptMode::Headless, Some(path)) => ResponseFile::load(path)?,
        (PromptMode::Record, Some(path)) => ResponseFile::empty(Some(path.to_path_buf())),
        _ => ResponseFile::empty(None),
    };
    Ok(Arc::new(Mutex::new(responses)))
}

pub struct Prompter {
    mode: PromptMode,
    responses: SharedResponses,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    /// Masked answers are read from the terminal rather than `input`.
    terminal: bool,
}

impl Prompter {
    pub fn new(mode: PromptMode, responses: SharedResponses) -> Self {
        Self {
            terminal: masked::stdin_is_terminal(),
            ..Self::with_io(
                mode,
                responses,
                Box::new(std::io::BufReader::new(std::io::stdin())),
                Box::new(std::io::stdout()),
            )
        }
    }

    pub fn with_io(
        mode: PromptMode,
        responses: SharedResponses,
        input: Box<dyn BufRead>,
        output: Box<dyn Write>,
    ) -> Self {
        Self {
            mode,
            responses,
            input,
            output,
            terminal: false,
        }
    }

    fn replayed(&self, key: &str) -> Result<Option<Value>> {
        if self.mode != PromptMode::Headless {
            return Ok(None);
        }
        let responses = self
            .responses
            .lock()
            .map_err(|_| anyhow!("response file lock poisoned"))?;
        Ok(responses.get(key).cloned())
    }

    fn remember(&self, key: &str, value: Value) -> Result<()> {
        if self.mode != PromptMode::Record {
            return Ok(());
        }
        self.responses
            .lock()
            .map_err(|_| anyhow!("response file lock poisoned"))?
            .record(key, value);
        Ok(())
    }

    fn read_line(&mut self, prompt_line: &str, masked: bool) -> Result<String> {
        write!(self.output, "{prompt_line}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        if masked && self.terminal {
            let secret = masked::read_password();
            writeln!(self.output).context("write newline")?;
            return Ok(secret?.trim().to_string());
        }
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read answer")?;
        if read == 0 {
            return Err(anyhow!("input closed while waiting for an answer"));
        }
        Ok(line.trim().to_string())
    }
}

impl Prompt for Prompter {
    fn confirm(&mut self, question: &str, default: bool, key: &str) -> Result<bool> {
        if self.mode == PromptMode::Headless {
            let answer = match self.replayed(key)? {
                Some(value) => parse_bool_value(&value)
                    .ok_or_else(|| anyhow!("response for {key} is not a yes/no answer"))?,
                None => default,
            };
            tracing::info!(key, answer, "{question}");
            return Ok(answer);
        }
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = loop {
            let line = self.read_line(&format!("{question} {hint}: "), false)?;
            if line.is_empty() {
                break default;
            }
            match parse_bool(&line) {
                Some(answer) => break answer,
                None => writeln!(self.output, "Please answer yes or no.").context("write hint")?,
            }
        };
        tracing::info!(key, answer, "{question}");
        self.remember(key, Value::Bool(answer))?;
        Ok(answer)
    }

    fn text(&mut self, question: &str, default: &str, masked: bool, key: &str) -> Result<String> {
        if self.mode == PromptMode::Headless {
            let answer = match self.replayed(key)? {
                Some(Value::String(text)) => text,
                Some(_) => return Err(anyhow!("response for {key} is not a string")),
                None => default.to_string(),
            };
            tracing::info!(key, masked, "{question}");
            return Ok(answer);
        }
        let hint = if masked || default.is_empty() {
            String::new()
        } else {
            format!(" [{default}]")
        };
        let line = self.read_line(&format!("{question}{hint}: "), masked)?;
        let answer = if line.is_empty() {
            default.to_string()
        } else {
            line
        };
        tracing::info!(key, masked, "{question}");
        // Masked answers never reach the response file.
        if !masked {
            self.remember(key, Value::String(answer.clone()))?;
        }
        Ok(answer)
    }

    fn choose(&mut self, question: &str, choices: &[String], key: &str) -> Result<String> {
        let first = choices
            .first()
            .ok_or_else(|| anyhow!("no choices offered for {key}"))?;
        if self.mode == PromptMode::Headless {
            let answer = match self.replayed(key)? {
                Some(Value::String(text)) if choices.contains(&text) => text,
                Some(other) => {
                    return Err(anyhow!("response for {key} is not one of {choices:?}: {other}"))
                }
                None => first.clone(),
            };
            tracing::info!(key, answer = %answer, "{question}");
            return Ok(answer);
        }
        for (idx, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {choice}", idx + 1).context("write choice")?;
        }
        let answer = loop {
            let line = self.read_line(&format!("{question} [{first}]: "), false)?;
            if line.is_empty() {
                break first.clone();
            }
            if let Some(choice) = resolve_choice(&line, choices) {
                break choice;
            }
            writeln!(self.output, "Please pick one of the listed choices.").context("write hint")?;
        };
        tracing::info!(key, answer = %answer, "{question}");
        self.remember(key, Value::String(answer.clone()))?;
        Ok(answer)
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn parse_bool_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(answer) => Some(*answer),
        Value::String(text) => parse_bool(text),
        _ => None,
    }
}

fn resolve_choice(line: &str, choices: &[String]) -> Option<String> {
    if let Ok(index) = line.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|idx| choices.get(idx))
            .cloned();
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(line))
        .cloned()
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
