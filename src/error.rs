//! Fatal error taxonomy and process exit codes.
//!
//! Only these errors end a run. Individual command failures are counted in the
//! execution result instead and surface through the final verdict.
use crate::exec::Checkpoint;
use crate::tooling::LocalTool;

/// Exit code used when the operator interrupts the run.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A registered or referenced manifest is absent.
    #[error("manifest not found: {0}")]
    ManifestNotFound(String),

    /// The configuration file or command-line options are unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A gating checkpoint failed and the rest of the plan was abandoned.
    #[error("{checkpoint} failed: {detail}")]
    FatalGate {
        checkpoint: Checkpoint,
        detail: String,
    },

    /// The operator answered "no" to a required agreement.
    #[error("operator declined {agreement}")]
    UserDeclined { agreement: String },

    /// A required local client is missing or unusable.
    #[error("{tool} is not installed: {hint}")]
    UnsupportedLocalTooling { tool: LocalTool, hint: String },

    /// Cloud providers are enabled but none of their clients are available.
    #[error("no usable cloud provider integration available")]
    NoCloudProvider,

    /// Ctrl+C while the terminal was in raw mode for a password prompt.
    #[error("interrupted by operator")]
    Interrupted,
}

impl BootstrapError {
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::ManifestNotFound(_) | BootstrapError::Config(_) => 1,
            BootstrapError::UserDeclined { .. } => 2,
            BootstrapError::UnsupportedLocalTooling { tool, .. } => match tool {
                LocalTool::Kubectl => 3,
                LocalTool::PolicyClient => 5,
            },
            BootstrapError::FatalGate { checkpoint, .. } => match checkpoint {
                Checkpoint::ClusterReachable => 4,
                Checkpoint::ReadyToProceed => 2,
            },
            BootstrapError::NoCloudProvider => 7,
            BootstrapError::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// Pick the exit code for a failed run, defaulting to the generic setup error.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BootstrapError>())
        .map(BootstrapError::exit_code)
        .unwrap_or(1)
}
