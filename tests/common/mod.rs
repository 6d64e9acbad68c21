//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Scratch workspace holding a manifest bundle, a log dir, and answer files.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn manifests(&self) -> PathBuf {
        self.dir.path().join("prereqs")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Populate the bundle using the file list `verify --json` reports.
    pub fn write_bundle(&self) {
        std::fs::create_dir_all(self.manifests()).expect("create manifests dir");
        let report = self.verify_report();
        for entry in report["manifests"].as_array().expect("manifest rows") {
            let rel = entry["path"].as_str().expect("manifest path");
            let path = self.manifests().join(rel);
            std::fs::create_dir_all(path.parent().expect("category dir"))
                .expect("create category dir");
            std::fs::write(&path, "# placeholder\n").expect("write manifest");
        }
    }

    pub fn verify_report(&self) -> Value {
        let manifests = path_arg(&self.manifests());
        let output = run_bootstrap(["verify", "--json", "--manifests", manifests.as_str()]);
        serde_json::from_slice(&output.stdout).expect("verify json")
    }

    pub fn write_answers(&self, name: &str, answers: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_vec_pretty(answers).expect("answers json"))
            .expect("write answers");
        path
    }

    /// Session flags every install or uninstall run shares.
    pub fn session_args(&self) -> Vec<String> {
        vec![
            "--manifests".to_string(),
            path_arg(&self.manifests()),
            "--log-dir".to_string(),
            path_arg(&self.log_dir()),
        ]
    }
}

pub fn path_arg(path: &Path) -> String {
    path.to_str().expect("utf-8 temp path").to_string()
}

pub fn run_bootstrap<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_k8s-bootstrap"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .output()
        .expect("run k8s-bootstrap")
}

/// Extract the pretty-printed plan that follows the progress lines.
pub fn plan_json(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    let start = text
        .find("{\n  \"kind\"")
        .unwrap_or_else(|| panic!("no plan in output:\n{text}"));
    serde_json::from_str(&text[start..]).expect("plan json")
}

/// Group names in plan order, suffixed with the step mode.
pub fn plan_groups(plan: &Value) -> Vec<String> {
    plan["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .map(|step| {
            format!(
                "{}:{}",
                step["group"].as_str().unwrap_or_default(),
                step["mode"].as_str().unwrap_or_default()
            )
        })
        .collect()
}
