//! Feature question graph for install and uninstall.
//!
//! Each question toggles one feature flag. A question is only issued when the
//! config lists its key; unasked questions take their `unasked` value. A
//! question with `requires` is skipped (flag false) unless the required flag
//! is already set, so ordering in the tables matters.
use crate::config::BootstrapConfig;
use crate::platform::PlatformContext;
use crate::prompts::Prompt;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Storage,
    Csi,
    Config,
    Cspaces,
    External,
    Spark,
    Drill,
    Kubeflow,
    Ui,
    Ingress,
}

/// Resolved operator selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub storage: bool,
    pub csi: bool,
    pub config: bool,
    pub cspaces: bool,
    pub external: bool,
    pub spark: bool,
    pub drill: bool,
    pub kubeflow: bool,
    pub ui: bool,
    pub ingress: bool,
}

impl FeatureFlags {
    pub fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Storage => self.storage,
            Feature::Csi => self.csi,
            Feature::Config => self.config,
            Feature::Cspaces => self.cspaces,
            Feature::External => self.external,
            Feature::Spark => self.spark,
            Feature::Drill => self.drill,
            Feature::Kubeflow => self.kubeflow,
            Feature::Ui => self.ui,
            Feature::Ingress => self.ingress,
        }
    }

    pub fn set(&mut self, feature: Feature, value: bool) {
        let slot = match feature {
            Feature::Storage => &mut self.storage,
            Feature::Csi => &mut self.csi,
            Feature::Config => &mut self.config,
            Feature::Cspaces => &mut self.cspaces,
            Feature::External => &mut self.external,
            Feature::Spark => &mut self.spark,
            Feature::Drill => &mut self.drill,
            Feature::Kubeflow => &mut self.kubeflow,
            Feature::Ui => &mut self.ui,
            Feature::Ingress => &mut self.ingress,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub key: &'static str,
    pub text: &'static str,
    pub feature: Feature,
    pub default: bool,
    /// Flag value when the question is not in the config's ask set.
    pub unasked: bool,
    pub requires: Option<Feature>,
    /// Only offered with `--core-install`.
    pub core_only: bool,
    /// Resolve cloud status before asking.
    pub resolves_cloud: bool,
}

const fn question(key: &'static str, text: &'static str, feature: Feature, default: bool) -> Question {
    Question {
        key,
        text,
        feature,
        default,
        unasked: default,
        requires: None,
        core_only: false,
        resolves_cloud: false,
    }
}

pub const INSTALL_QUESTIONS: &[Question] = &[
    question("INSTALL_CSI", "Install MapR CSI driver?", Feature::Csi, true),
    question("INSTALL_CONFIG", "Install configuration templates?", Feature::Config, true),
    question("INSTALL_EXTERNAL", "Install external cluster namespace?", Feature::External, true),
    question("INSTALL_CSPACES", "Install MapR CSPACES?", Feature::Cspaces, true),
    question("INSTALL_SPARK", "Install Spark components?", Feature::Spark, true),
    question("INSTALL_DRILL", "Install Drill components?", Feature::Drill, true),
    question("INSTALL_KUBEFLOW", "Install Kubeflow components?", Feature::Kubeflow, false),
    Question {
        unasked: false,
        core_only: true,
        ..question("CREATE_STORAGE", "Install MapR Data Platform?", Feature::Storage, true)
    },
    Question {
        requires: Some(Feature::Storage),
        ..question("INSTALL_UI", "Configure MapR Picasso Admin UI?", Feature::Ui, false)
    },
    Question {
        requires: Some(Feature::Storage),
        resolves_cloud: true,
        ..question("INSTALL_INGRESS", "Configure MapR Ingress?", Feature::Ingress, false)
    },
];

pub const UNINSTALL_QUESTIONS: &[Question] = &[
    question("REMOVE_CSI", "Remove MapR CSI driver?", Feature::Csi, false),
    question("REMOVE_CSPACES", "Remove MapR CSPACES?", Feature::Cspaces, false),
    question("REMOVE_STORAGE", "Remove MapR Data Platform?", Feature::Storage, false),
    question("REMOVE_SPARK", "Remove Spark components?", Feature::Spark, false),
    question("REMOVE_DRILL", "Remove Drill components?", Feature::Drill, false),
    question("REMOVE_KUBEFLOW", "Remove Kubeflow components?", Feature::Kubeflow, false),
    question("REMOVE_CONFIG", "Remove MapR Configuration?", Feature::Config, false),
    question("REMOVE_EXTERNAL_INFO", "Remove MapR External Info?", Feature::External, false),
    Question {
        requires: Some(Feature::Storage),
        ..question("REMOVE_UI", "Remove MapR Picasso Admin UI?", Feature::Ui, false)
    },
    Question {
        requires: Some(Feature::Storage),
        resolves_cloud: true,
        ..question("REMOVE_INGRESS", "Remove MapR Ingress?", Feature::Ingress, false)
    },
];

pub const INSTALL_CLOUD_QUESTION: &str = "Installing to a previously created cloud environment?";
pub const UNINSTALL_CLOUD_QUESTION: &str = "Is this a cloud env?";

/// Walks a question table and resolves it into [`FeatureFlags`].
pub struct FeatureSelector<'a> {
    config: &'a BootstrapConfig,
    install: bool,
    core_install: bool,
}

impl<'a> FeatureSelector<'a> {
    pub fn install(config: &'a BootstrapConfig, core_install: bool) -> Self {
        Self {
            config,
            install: true,
            core_install,
        }
    }

    pub fn uninstall(config: &'a BootstrapConfig) -> Self {
        Self {
            config,
            install: false,
            core_install: false,
        }
    }

    pub fn questions(&self) -> &'static [Question] {
        if self.install {
            INSTALL_QUESTIONS
        } else {
            UNINSTALL_QUESTIONS
        }
    }

    pub fn select(
        &self,
        prompt: &mut dyn Prompt,
        platform: &mut PlatformContext,
    ) -> Result<FeatureFlags> {
        let mut flags = FeatureFlags::default();
        for question in self.questions() {
            let value = self.resolve(question, &flags, prompt, platform)?;
            flags.set(question.feature, value);
        }
        tracing::info!(?flags, install = self.install, "features selected");
        Ok(flags)
    }

    fn resolve(
        &self,
        question: &Question,
        flags: &FeatureFlags,
        prompt: &mut dyn Prompt,
        platform: &mut PlatformContext,
    ) -> Result<bool> {
        if question.core_only && !self.core_install {
            return Ok(false);
        }
        if let Some(required) = question.requires {
            if !flags.get(required) {
                return Ok(false);
            }
        }
        if !self.config.asks(question.key, self.install) {
            return Ok(question.unasked);
        }
        if question.resolves_cloud {
            let cloud_question = if self.install {
                INSTALL_CLOUD_QUESTION
            } else {
                UNINSTALL_CLOUD_QUESTION
            };
            platform.resolve_cloud(prompt, cloud_question)?;
        }
        prompt.confirm(question.text, question.default, question.key)
    }
}
