//! Install and uninstall plans.
//!
//! A plan is a fold over a fixed stage table: each stage names a component
//! group, the mode it runs in, and a predicate over the selected features.
//! Group contents live in [`groups`]; the delete form of a group is derived
//! from its apply form so the two cannot drift apart.
mod groups;

use crate::catalog::{ManifestCatalog, ManifestKey};
use crate::error::BootstrapError;
use crate::exec::Checkpoint;
use crate::features::FeatureFlags;
use crate::platform::PlatformContext;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Install,
    Uninstall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupId {
    Preflight,
    BootstrapSupport,
    Readiness,
    ConfigurationCspaces,
    ConfigurationClusters,
    Csi,
    External,
    SystemCspace,
    SystemCluster,
    Spark,
    Drill,
    Kubeflow,
    Ingress,
    Ui,
}

impl GroupId {
    pub fn name(self) -> &'static str {
        match self {
            GroupId::Preflight => "preflight",
            GroupId::BootstrapSupport => "bootstrap-support",
            GroupId::Readiness => "readiness",
            GroupId::ConfigurationCspaces => "configuration-cspaces",
            GroupId::ConfigurationClusters => "configuration-clusters",
            GroupId::Csi => "csi",
            GroupId::External => "external",
            GroupId::SystemCspace => "system-cspace",
            GroupId::SystemCluster => "system-cluster",
            GroupId::Spark => "spark",
            GroupId::Drill => "drill",
            GroupId::Kubeflow => "kubeflow",
            GroupId::Ingress => "ingress",
            GroupId::Ui => "ui",
        }
    }

    /// Operator-facing description used in progress lines.
    pub fn title(self) -> &'static str {
        match self {
            GroupId::Preflight => "cluster connectivity check",
            GroupId::BootstrapSupport => "bootstrap components",
            GroupId::Readiness => "readiness confirmation",
            GroupId::ConfigurationCspaces => "compute space configuration",
            GroupId::ConfigurationClusters => "cluster configuration",
            GroupId::Csi => "CSI driver components",
            GroupId::External => "external cluster namespace",
            GroupId::SystemCspace => "compute space operator components",
            GroupId::SystemCluster => "cluster operator components",
            GroupId::Spark => "Spark components",
            GroupId::Drill => "Drill components",
            GroupId::Kubeflow => "Kubeflow components",
            GroupId::Ingress => "ingress components",
            GroupId::Ui => "admin UI components",
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Apply,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Apply,
    Delete,
    RunShellStep,
}

/// Platform condition under which an operation is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Common,
    Default,
    PolicyVariant,
    Cloud,
    BareMetal,
}

impl Variant {
    pub fn applies(self, platform: &PlatformContext) -> bool {
        match self {
            Variant::Common => true,
            Variant::Default => !platform.policy_variant_active,
            Variant::PolicyVariant => platform.policy_variant_active,
            Variant::Cloud => platform.is_cloud(),
            Variant::BareMetal => !platform.is_cloud(),
        }
    }
}

/// Client that executes a manifest operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Kubectl,
    Policy,
}

/// Grants a cluster role to a namespaced service account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyBinding {
    pub cluster_role: &'static str,
    pub namespace: &'static str,
    pub service_account: &'static str,
}

impl PolicyBinding {
    pub fn subject(&self) -> String {
        format!(
            "system:serviceaccount:{}:{}",
            self.namespace, self.service_account
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Manifest { key: ManifestKey, tool: Tool },
    PolicyBinding(PolicyBinding),
    UserSecret,
    Checkpoint(Checkpoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManifestOperation {
    pub kind: OperationKind,
    pub target: Target,
    pub tolerate_missing: bool,
    pub variant: Variant,
    /// Left in place when the group is torn down.
    #[serde(skip)]
    pub retained_on_teardown: bool,
}

impl ManifestOperation {
    pub fn manifest_key(&self) -> Option<ManifestKey> {
        match self.target {
            Target::Manifest { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The delete counterpart of an apply operation. Shell steps have none.
    fn inverse(&self) -> Option<Self> {
        match (self.kind, self.target) {
            (OperationKind::Apply, Target::Manifest { .. } | Target::PolicyBinding(_)) => {
                Some(Self {
                    kind: OperationKind::Delete,
                    ..*self
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for ManifestOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.target) {
            (OperationKind::Apply, Target::PolicyBinding(binding)) => {
                write!(f, "bind {} to {}", binding.cluster_role, binding.subject())
            }
            (_, Target::PolicyBinding(binding)) => {
                write!(f, "unbind {} from {}", binding.cluster_role, binding.subject())
            }
            (OperationKind::Delete, Target::Manifest { key, .. }) => write!(f, "delete {key}"),
            (_, Target::Manifest { key, .. }) => write!(f, "apply {key}"),
            (_, Target::UserSecret) => f.write_str("create user secret"),
            (_, Target::Checkpoint(checkpoint)) => write!(f, "check {checkpoint}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub group: GroupId,
    pub mode: Mode,
    pub operations: Vec<ManifestOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub platform: PlatformContext,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn operations(&self) -> impl Iterator<Item = &ManifestOperation> {
        self.steps.iter().flat_map(|step| step.operations.iter())
    }

    pub fn groups(&self) -> Vec<(GroupId, Mode)> {
        self.steps.iter().map(|step| (step.group, step.mode)).collect()
    }

    /// Confirm every referenced manifest resolves before anything runs.
    pub fn verify(&self, catalog: &ManifestCatalog) -> Result<(), BootstrapError> {
        for key in self.operations().filter_map(ManifestOperation::manifest_key) {
            catalog.lookup(key)?;
        }
        Ok(())
    }
}

struct Stage {
    group: GroupId,
    mode: Mode,
    include: fn(&FeatureFlags) -> bool,
}

const fn stage(group: GroupId, mode: Mode, include: fn(&FeatureFlags) -> bool) -> Stage {
    Stage {
        group,
        mode,
        include,
    }
}

const INSTALL_STAGES: &[Stage] = &[
    stage(GroupId::Preflight, Mode::Apply, |_| true),
    stage(GroupId::BootstrapSupport, Mode::Apply, |f| f.storage),
    stage(GroupId::Readiness, Mode::Apply, |f| f.storage),
    stage(GroupId::ConfigurationCspaces, Mode::Apply, |f| f.config && f.cspaces),
    stage(GroupId::ConfigurationClusters, Mode::Apply, |f| f.config && f.storage),
    stage(GroupId::Csi, Mode::Apply, |f| f.csi),
    stage(GroupId::External, Mode::Apply, |f| f.external),
    // The cluster operator runs in the cspace system namespace.
    stage(GroupId::SystemCspace, Mode::Apply, |f| f.cspaces || f.storage),
    stage(GroupId::SystemCluster, Mode::Apply, |f| f.storage),
    stage(GroupId::Spark, Mode::Apply, |f| f.spark),
    stage(GroupId::Drill, Mode::Apply, |f| f.drill),
    stage(GroupId::Kubeflow, Mode::Apply, |f| f.kubeflow),
    stage(GroupId::Ingress, Mode::Apply, |f| f.storage && f.ingress),
    stage(GroupId::Ui, Mode::Apply, |f| f.storage && f.ui),
    stage(GroupId::BootstrapSupport, Mode::Delete, |f| f.storage),
];

const UNINSTALL_STAGES: &[Stage] = &[
    stage(GroupId::Csi, Mode::Delete, |f| f.csi),
    stage(GroupId::ConfigurationCspaces, Mode::Delete, |f| f.config && f.cspaces),
    stage(GroupId::ConfigurationClusters, Mode::Delete, |f| f.config && f.storage),
    stage(GroupId::SystemCluster, Mode::Delete, |f| f.storage),
    stage(GroupId::SystemCspace, Mode::Delete, |f| f.cspaces),
    stage(GroupId::Drill, Mode::Delete, |f| f.drill),
    stage(GroupId::Spark, Mode::Delete, |f| f.spark),
    stage(GroupId::Kubeflow, Mode::Delete, |f| f.kubeflow),
    stage(GroupId::Ui, Mode::Delete, |f| f.storage && f.ui),
    stage(GroupId::Ingress, Mode::Delete, |f| f.storage && f.ingress),
    stage(GroupId::External, Mode::Delete, |f| f.external),
];

pub fn build_install_plan(flags: &FeatureFlags, platform: &PlatformContext) -> Plan {
    build(PlanKind::Install, INSTALL_STAGES, flags, platform)
}

pub fn build_uninstall_plan(flags: &FeatureFlags, platform: &PlatformContext) -> Plan {
    build(PlanKind::Uninstall, UNINSTALL_STAGES, flags, platform)
}

fn build(
    kind: PlanKind,
    stages: &[Stage],
    flags: &FeatureFlags,
    platform: &PlatformContext,
) -> Plan {
    let steps = stages
        .iter()
        .filter(|stage| (stage.include)(flags))
        .map(|stage| group_step(stage.group, stage.mode, platform))
        .collect();
    Plan {
        kind,
        platform: *platform,
        steps,
    }
}

/// Materialize one group in the given mode for this platform.
pub fn group_step(group: GroupId, mode: Mode, platform: &PlatformContext) -> PlanStep {
    let apply = groups::apply_operations(group);
    let operations = match mode {
        Mode::Apply => apply,
        Mode::Delete => teardown(&apply),
    };
    PlanStep {
        group,
        mode,
        operations: operations
            .into_iter()
            .filter(|operation| operation.variant.applies(platform))
            .collect(),
    }
}

/// Reverse of the apply order, minus retained resources and shell steps.
fn teardown(apply: &[ManifestOperation]) -> Vec<ManifestOperation> {
    apply
        .iter()
        .rev()
        .filter(|operation| !operation.retained_on_teardown)
        .filter_map(ManifestOperation::inverse)
        .collect()
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
