//! Sequential plan execution.
//!
//! Each operation becomes one process invocation. A failed command is
//! counted and the run moves on; only a failed checkpoint stops the plan.
mod runner;

pub use runner::{CommandLine, CommandOutput, CommandRunner, SystemRunner};

use crate::catalog::ManifestCatalog;
use crate::config::BootstrapConfig;
use crate::plan::{
    ManifestOperation, Mode, OperationKind, Plan, PolicyBinding, Target, Tool,
};
use crate::platform::PlatformContext;
use crate::prompts::Prompt;
use crate::secrets::SecretBundle;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Gating steps that abort the remaining plan on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    ClusterReachable,
    ReadyToProceed,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Checkpoint::ClusterReachable => "cluster reachability check",
            Checkpoint::ReadyToProceed => "ready-to-proceed confirmation",
        })
    }
}

/// Command builders for the apply tool and the policy client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTools {
    kubectl: Vec<String>,
    policy: Vec<String>,
}

impl ClusterTools {
    pub fn new(kubectl: Vec<String>, policy: Vec<String>) -> Self {
        Self { kubectl, policy }
    }

    pub fn from_config(config: &BootstrapConfig) -> Result<Self> {
        Ok(Self::new(config.kubectl_argv()?, config.policy_client_argv()?))
    }

    pub fn kubectl_program(&self) -> &str {
        self.kubectl.first().map(String::as_str).unwrap_or("kubectl")
    }

    pub fn policy_program(&self) -> &str {
        self.policy.first().map(String::as_str).unwrap_or("oc")
    }

    fn command<I, S>(&self, tool: Tool, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let base = match tool {
            Tool::Kubectl => &self.kubectl,
            Tool::Policy => &self.policy,
        };
        base.iter()
            .cloned()
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    pub fn apply(&self, tool: Tool, manifest: &Path) -> CommandLine {
        let path = manifest.display().to_string();
        CommandLine::new(self.command(tool, ["apply".to_string(), "-f".to_string(), path]))
    }

    pub fn delete(&self, tool: Tool, manifest: &Path, ignore_not_found: bool) -> CommandLine {
        let mut args = vec![
            "delete".to_string(),
            "-f".to_string(),
            manifest.display().to_string(),
        ];
        if ignore_not_found {
            args.push("--ignore-not-found".to_string());
        }
        CommandLine::new(self.command(tool, args))
    }

    pub fn bind(&self, binding: &PolicyBinding) -> CommandLine {
        self.policy_command("add-cluster-role-to-user", binding)
    }

    pub fn unbind(&self, binding: &PolicyBinding) -> CommandLine {
        self.policy_command("remove-cluster-role-from-user", binding)
    }

    fn policy_command(&self, verb: &str, binding: &PolicyBinding) -> CommandLine {
        CommandLine::new(self.command(
            Tool::Policy,
            [
                "adm".to_string(),
                "policy".to_string(),
                verb.to_string(),
                binding.cluster_role.to_string(),
                binding.subject(),
            ],
        ))
    }

    pub fn get_nodes(&self) -> CommandLine {
        CommandLine::new(self.command(Tool::Kubectl, ["get", "nodes"]))
    }

    pub fn policy_status(&self) -> CommandLine {
        CommandLine::new(self.command(Tool::Policy, ["status"]))
    }

    /// Apply-tool argv with extra arguments, for callers that build their own
    /// display form.
    pub fn kubectl_argv<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Tool::Kubectl, args)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
    Skipped,
    Passed,
}

/// Recorded once per operation reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub group: String,
    pub operation: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateFailure {
    pub checkpoint: Checkpoint,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Non-checkpoint operations handed to the runner.
    pub attempted: usize,
    pub errors: usize,
    /// Session warnings raised before the run plus skipped operations.
    pub warnings: usize,
    pub outcomes: Vec<OperationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<GateFailure>,
}

impl ExecutionResult {
    fn record(
        &mut self,
        group: &str,
        operation: &ManifestOperation,
        status: OutcomeStatus,
        detail: Option<String>,
    ) {
        self.outcomes.push(OperationOutcome {
            group: group.to_string(),
            operation: operation.to_string(),
            status,
            detail,
        });
    }
}

/// Runs plans against a cluster through a [`CommandRunner`].
pub struct Engine<'a> {
    runner: &'a mut dyn CommandRunner,
    prompt: &'a mut dyn Prompt,
    catalog: &'a ManifestCatalog,
    tools: &'a ClusterTools,
    platform: PlatformContext,
    secrets: Option<&'a SecretBundle>,
    session_warnings: usize,
}

impl<'a> Engine<'a> {
    pub fn new(
        runner: &'a mut dyn CommandRunner,
        prompt: &'a mut dyn Prompt,
        catalog: &'a ManifestCatalog,
        tools: &'a ClusterTools,
        platform: PlatformContext,
    ) -> Self {
        Self {
            runner,
            prompt,
            catalog,
            tools,
            platform,
            secrets: None,
            session_warnings: 0,
        }
    }

    pub fn with_secrets(mut self, secrets: Option<&'a SecretBundle>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Warnings the session raised before the plan started.
    pub fn with_session_warnings(mut self, warnings: usize) -> Self {
        self.session_warnings = warnings;
        self
    }

    pub fn run(&mut self, plan: &Plan) -> ExecutionResult {
        let mut result = ExecutionResult {
            warnings: self.session_warnings,
            ..ExecutionResult::default()
        };
        for step in &plan.steps {
            let verb = match step.mode {
                Mode::Apply => "Installing",
                Mode::Delete => "Removing",
            };
            println!("{verb} {}...", step.group.title());
            tracing::info!(group = %step.group, mode = ?step.mode, operations = step.operations.len(), "step started");
            let group = step.group.name();

            for operation in &step.operations {
                if let Target::Checkpoint(checkpoint) = operation.target {
                    match self.checkpoint(checkpoint) {
                        Ok(()) => result.record(group, operation, OutcomeStatus::Passed, None),
                        Err(detail) => {
                            tracing::error!(%checkpoint, %detail, "checkpoint failed; aborting plan");
                            result.errors += 1;
                            result.record(
                                group,
                                operation,
                                OutcomeStatus::Failed,
                                Some(detail.clone()),
                            );
                            result.aborted_at = Some(GateFailure { checkpoint, detail });
                            return result;
                        }
                    }
                    continue;
                }

                if !operation.variant.applies(&self.platform) {
                    tracing::warn!(group, %operation, variant = ?operation.variant, "operation does not match platform; skipped");
                    result.warnings += 1;
                    result.record(group, operation, OutcomeStatus::Skipped, None);
                    continue;
                }

                result.attempted += 1;
                match self.execute(operation) {
                    Ok(output) if output.success() => {
                        result.record(group, operation, OutcomeStatus::Succeeded, None);
                    }
                    Ok(output) => {
                        let detail = output.summary();
                        tracing::error!(group, %operation, %detail, "operation failed");
                        result.errors += 1;
                        result.record(group, operation, OutcomeStatus::Failed, Some(detail));
                    }
                    Err(err) => {
                        let detail = format!("{err:#}");
                        tracing::error!(group, %operation, %detail, "operation could not run");
                        result.errors += 1;
                        result.record(group, operation, OutcomeStatus::Failed, Some(detail));
                    }
                }
            }
        }
        tracing::info!(
            attempted = result.attempted,
            errors = result.errors,
            warnings = result.warnings,
            "plan finished"
        );
        result
    }

    fn execute(&mut self, operation: &ManifestOperation) -> Result<CommandOutput> {
        let command = match (operation.kind, operation.target) {
            (OperationKind::Apply, Target::Manifest { key, tool }) => {
                self.tools.apply(tool, self.catalog.lookup(key)?)
            }
            (OperationKind::Delete, Target::Manifest { key, tool }) => self.tools.delete(
                tool,
                self.catalog.lookup(key)?,
                operation.tolerate_missing,
            ),
            (OperationKind::Apply, Target::PolicyBinding(binding)) => self.tools.bind(&binding),
            (OperationKind::Delete, Target::PolicyBinding(binding)) => {
                self.tools.unbind(&binding)
            }
            (_, Target::UserSecret) => self
                .secrets
                .ok_or_else(|| anyhow!("user secret values were not collected"))?
                .create_command(self.tools),
            (kind, target) => return Err(anyhow!("unsupported operation {kind:?} on {target:?}")),
        };
        self.runner.run(&command)
    }

    fn checkpoint(&mut self, checkpoint: Checkpoint) -> Result<(), String> {
        match checkpoint {
            Checkpoint::ClusterReachable => check_cluster(&mut *self.runner, self.tools),
            Checkpoint::ReadyToProceed => {
                println!(
                    "We are now ready to install the basic components for running the platform."
                );
                let ready = self
                    .prompt
                    .confirm("Continue with installation?", true, "CONTINUE_INSTALL")
                    .map_err(|err| format!("{err:#}"))?;
                if ready {
                    Ok(())
                } else {
                    Err("operator is not ready to install system components".to_string())
                }
            }
        }
    }
}

/// `kubectl get nodes` must succeed. The error is the operator-facing reason.
pub fn check_cluster(runner: &mut dyn CommandRunner, tools: &ClusterTools) -> Result<(), String> {
    let output = runner
        .run(&tools.get_nodes())
        .map_err(|err| format!("{err:#}"))?;
    if output.success() {
        Ok(())
    } else {
        Err(format!("unable to reach the cluster: {}", output.summary()))
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
