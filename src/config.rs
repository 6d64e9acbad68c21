//! Bootstrap configuration.
//!
//! The config file is optional; every field has a default so a bare
//! `k8s-bootstrap install` works against a standard manifest bundle.
use crate::error::BootstrapError;
use crate::features::{INSTALL_QUESTIONS, UNINSTALL_QUESTIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current schema version for the bootstrap config file.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Manifest bundle location used when neither flag nor config names one.
pub const DEFAULT_MANIFESTS_DIR: &str = "prereqs";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifests_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// Declarative apply tool, split with shell quoting rules.
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
    /// Policy-management tool used on the security-policy variant.
    #[serde(default = "default_policy_client")]
    pub policy_client: String,
    /// Install question keys offered to the operator; others take their
    /// unasked value.
    #[serde(default = "default_install_questions")]
    pub install_questions: Vec<String>,
    #[serde(default = "default_uninstall_questions")]
    pub uninstall_questions: Vec<String>,
    #[serde(default)]
    pub secrets: SecretDefaults,
    #[serde(default)]
    pub cloud_providers: Vec<CloudProviderConfig>,
}

/// Values pre-seeded into the user secret prompts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretDefaults {
    pub user: String,
    pub group: String,
    pub uid: u32,
    pub gid: u32,
    pub password: String,
    pub mysql_user: String,
    pub mysql_password: String,
    pub ldapadmin_user: String,
    pub ldapadmin_password: String,
    pub ldapbind_user: String,
    pub ldapbind_password: String,
}

impl Default for SecretDefaults {
    fn default() -> Self {
        Self {
            user: "mapr".to_string(),
            group: "mapr".to_string(),
            uid: 5000,
            gid: 5000,
            password: "mapr".to_string(),
            mysql_user: "admin".to_string(),
            mysql_password: "mapr".to_string(),
            ldapadmin_user: "admin".to_string(),
            ldapadmin_password: "mapr".to_string(),
            ldapbind_user: "readonly".to_string(),
            ldapbind_password: "readonly".to_string(),
        }
    }
}

/// A cloud provider that can build a Kubernetes environment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CloudProviderConfig {
    pub name: String,
    /// Client binary that must be on PATH for the provider to be offered.
    pub program: String,
    pub build_command: String,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_policy_client() -> String {
    "oc".to_string()
}

fn default_install_questions() -> Vec<String> {
    ["OPENSHIFT_ENV", "INSTALL_CSI", "CREATE_STORAGE"]
        .iter()
        .map(|key| key.to_string())
        .collect()
}

fn default_uninstall_questions() -> Vec<String> {
    UNINSTALL_QUESTIONS
        .iter()
        .map(|question| question.key.to_string())
        .collect()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            manifests_dir: None,
            log_dir: None,
            kubectl: default_kubectl(),
            policy_client: default_policy_client(),
            install_questions: default_install_questions(),
            uninstall_questions: default_uninstall_questions(),
            secrets: SecretDefaults::default(),
            cloud_providers: Vec::new(),
        }
    }
}

impl BootstrapConfig {
    pub fn kubectl_argv(&self) -> Result<Vec<String>> {
        split_command(&self.kubectl, "kubectl")
    }

    pub fn policy_client_argv(&self) -> Result<Vec<String>> {
        split_command(&self.policy_client, "policy_client")
    }

    pub fn asks(&self, key: &str, install: bool) -> bool {
        let keys = if install {
            &self.install_questions
        } else {
            &self.uninstall_questions
        };
        keys.iter().any(|candidate| candidate == key)
    }
}

/// Load the config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<BootstrapConfig> {
    let Some(path) = path else {
        return Ok(BootstrapConfig::default());
    };
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: BootstrapConfig = serde_json::from_slice(&bytes)
        .map_err(|err| BootstrapError::Config(format!("{}: {err}", path.display())))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &BootstrapConfig) -> Result<(), BootstrapError> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(BootstrapError::Config(format!(
            "unsupported config schema_version {}",
            config.schema_version
        )));
    }
    for key in &config.install_questions {
        let known = key == "OPENSHIFT_ENV" || INSTALL_QUESTIONS.iter().any(|q| q.key == key);
        if !known {
            return Err(BootstrapError::Config(format!(
                "unknown install question {key:?}"
            )));
        }
    }
    for key in &config.uninstall_questions {
        if !UNINSTALL_QUESTIONS.iter().any(|q| q.key == key) {
            return Err(BootstrapError::Config(format!(
                "unknown uninstall question {key:?}"
            )));
        }
    }
    for provider in &config.cloud_providers {
        if provider.name.trim().is_empty() {
            return Err(BootstrapError::Config(
                "cloud provider name must be non-empty".to_string(),
            ));
        }
        if shell_words::split(&provider.build_command)
            .map(|argv| argv.is_empty())
            .unwrap_or(true)
        {
            return Err(BootstrapError::Config(format!(
                "cloud provider {} has an unusable build_command",
                provider.name
            )));
        }
    }
    Ok(())
}

fn split_command(command: &str, label: &str) -> Result<Vec<String>> {
    let argv = shell_words::split(command)
        .map_err(|err| BootstrapError::Config(format!("parse {label} command: {err}")))?;
    if argv.is_empty() {
        return Err(BootstrapError::Config(format!("{label} command is empty")).into());
    }
    Ok(argv)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
