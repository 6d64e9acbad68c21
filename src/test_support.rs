//! Shared fixtures for unit tests.
use crate::catalog::{ManifestCatalog, ManifestKey};
use crate::exec::{CommandLine, CommandOutput, CommandRunner};
use crate::prompts::Prompt;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Write an empty manifest file for every catalog entry under `root`.
pub(crate) fn write_manifest_tree(root: &Path) {
    for key in ManifestKey::ALL {
        let dir = root.join(key.category().dir_name());
        std::fs::create_dir_all(&dir).expect("create category dir");
        std::fs::write(dir.join(key.file_name()), format!("# {}\n", key.name()))
            .expect("write manifest");
    }
}

/// Build a fully populated catalog inside a fresh temp dir.
pub(crate) fn loaded_catalog() -> (tempfile::TempDir, ManifestCatalog) {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_manifest_tree(dir.path());
    let catalog = ManifestCatalog::load(dir.path()).expect("load catalog");
    (dir, catalog)
}

/// Prompt double that answers from a fixed table and records every key asked.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    confirms: BTreeMap<String, bool>,
    texts: BTreeMap<String, String>,
    pub(crate) asked: Vec<String>,
}

impl ScriptedPrompt {
    pub(crate) fn answering(answers: &[(&str, bool)]) -> Self {
        Self {
            confirms: answers
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_text(mut self, key: &str, value: &str) -> Self {
        self.texts.insert(key.to_string(), value.to_string());
        self
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, _question: &str, default: bool, key: &str) -> Result<bool> {
        self.asked.push(key.to_string());
        Ok(self.confirms.get(key).copied().unwrap_or(default))
    }

    fn text(&mut self, _question: &str, default: &str, _masked: bool, key: &str) -> Result<String> {
        self.asked.push(key.to_string());
        Ok(self
            .texts
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    fn choose(&mut self, _question: &str, choices: &[String], key: &str) -> Result<String> {
        self.asked.push(key.to_string());
        match self.texts.get(key) {
            Some(choice) => Ok(choice.clone()),
            None => choices
                .first()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no choices for {key}")),
        }
    }
}

/// Runner double that records every command line and fails on request.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub(crate) commands: Vec<String>,
    pub(crate) argvs: Vec<Vec<String>>,
    failing: Vec<String>,
    responses: BTreeMap<String, CommandOutput>,
    unavailable: bool,
}

impl RecordingRunner {
    /// Canned output for an exact display string.
    pub(crate) fn respond(mut self, display: &str, output: CommandOutput) -> Self {
        self.responses.insert(display.to_string(), output);
        self
    }

    /// Exit 1 for any command whose display contains `needle`.
    pub(crate) fn fail_matching(mut self, needle: &str) -> Self {
        self.failing.push(needle.to_string());
        self
    }

    /// Every command fails to start.
    pub(crate) fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &CommandLine) -> Result<CommandOutput> {
        self.commands.push(command.display.clone());
        self.argvs.push(command.argv.clone());
        if self.unavailable {
            return Err(anyhow::anyhow!("spawn {}: not found", command.argv[0]));
        }
        if let Some(output) = self.responses.get(&command.display) {
            return Ok(output.clone());
        }
        if self
            .failing
            .iter()
            .any(|needle| command.display.contains(needle.as_str()))
        {
            return Ok(CommandOutput {
                status: Some(1),
                output: "error: simulated failure\n".to_string(),
            });
        }
        Ok(CommandOutput {
            status: Some(0),
            output: "ok\n".to_string(),
        })
    }
}
