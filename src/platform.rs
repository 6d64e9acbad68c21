//! Facts about the target cluster that shape the plan.
use crate::exec::{ClusterTools, CommandRunner};
use crate::prompts::Prompt;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformContext {
    /// The cluster enforces security objects and policy binds.
    pub policy_variant_active: bool,
    /// `None` until resolved by a question or a cloud build.
    pub cloud_provisioned: Option<bool>,
}

impl PlatformContext {
    pub fn is_cloud(&self) -> bool {
        self.cloud_provisioned.unwrap_or(false)
    }

    /// Settle cloud status once. A known answer is kept, the policy variant
    /// is never a cloud build, otherwise the operator is asked.
    pub fn resolve_cloud(&mut self, prompt: &mut dyn Prompt, question: &str) -> Result<bool> {
        if let Some(known) = self.cloud_provisioned {
            return Ok(known);
        }
        let cloud = if self.policy_variant_active {
            false
        } else {
            prompt.confirm(question, true, "CLOUD_ENV")?
        };
        self.cloud_provisioned = Some(cloud);
        tracing::info!(cloud, "cloud environment resolved");
        Ok(cloud)
    }
}

/// Query the policy client: a successful status without warnings means the
/// policy variant is active. A client that cannot start means it is not.
pub fn detect_policy_variant(runner: &mut dyn CommandRunner, tools: &ClusterTools) -> bool {
    let command = tools.policy_status();
    match runner.run(&command) {
        Ok(output) => {
            let active = output.success() && !output.output.to_lowercase().contains("warnings");
            tracing::info!(active, status = ?output.status, "policy variant checked");
            active
        }
        Err(err) => {
            tracing::info!(error = %err, "policy client unavailable; assuming vanilla cluster");
            false
        }
    }
}
