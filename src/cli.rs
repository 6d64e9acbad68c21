//! CLI argument parsing for the bootstrap installer.
use crate::prompts::PromptMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "k8s-bootstrap",
    version,
    about = "Install and remove platform operators on a Kubernetes cluster",
    after_help = "Commands:\n  install     Create the selected components on the connected cluster\n  uninstall   Remove the selected components from the connected cluster\n  verify      Check that every manifest in the bundle is present\n\nExamples:\n  k8s-bootstrap install\n  k8s-bootstrap install --mode record --response-file answers.json\n  k8s-bootstrap install --mode headless --response-file answers.json --dry-run\n  k8s-bootstrap uninstall --manifests ./prereqs\n  k8s-bootstrap verify --manifests ./prereqs --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Install(InstallArgs),
    Uninstall(UninstallArgs),
    Verify(VerifyArgs),
}

/// Options shared by install and uninstall.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Prompt mode
    #[arg(short = 'm', long, value_enum, default_value_t = PromptMode::Prompt)]
    pub mode: PromptMode,

    /// Response file read in headless mode and written in record mode
    #[arg(short = 'r', long, value_name = "PATH")]
    pub response_file: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Manifest bundle root (overrides the config)
    #[arg(long, value_name = "DIR")]
    pub manifests: Option<PathBuf>,

    /// Directory for session logs (overrides the config)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the resolved plan as JSON instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Install platform components")]
pub struct InstallArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Offer to build a cloud Kubernetes environment first (unsupported)
    #[arg(long, hide = true)]
    pub cloud_install: bool,

    /// Offer the core data platform (unsupported)
    #[arg(long, hide = true)]
    pub core_install: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Remove platform components")]
pub struct UninstallArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Check the manifest bundle without touching the cluster")]
pub struct VerifyArgs {
    /// Manifest bundle root
    #[arg(long, value_name = "DIR")]
    pub manifests: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
