//! Local client checks run before any cluster contact.
use crate::error::BootstrapError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTool {
    Kubectl,
    PolicyClient,
}

impl fmt::Display for LocalTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocalTool::Kubectl => "kubectl",
            LocalTool::PolicyClient => "oc",
        })
    }
}

impl LocalTool {
    fn hint(self) -> &'static str {
        match self {
            LocalTool::Kubectl => {
                "install kubectl and make sure it is on PATH before running this command"
            }
            LocalTool::PolicyClient => {
                "Openshift installs need the oc client on PATH before running this command"
            }
        }
    }
}

/// Resolve `program` on PATH or fail with the tool's exit code.
pub fn require(tool: LocalTool, program: &str) -> Result<PathBuf, BootstrapError> {
    match which::which(program) {
        Ok(path) => {
            tracing::debug!(%tool, path = %path.display(), "local tool found");
            Ok(path)
        }
        Err(err) => {
            tracing::debug!(%tool, program, error = %err, "local tool missing");
            Err(BootstrapError::UnsupportedLocalTooling {
                tool,
                hint: tool.hint().to_string(),
            })
        }
    }
}

/// Whether `program` resolves on PATH.
pub fn available(program: &str) -> bool {
    which::which(program).is_ok()
}
