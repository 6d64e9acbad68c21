//! Optional cloud environment build before install.
use crate::config::CloudProviderConfig;
use crate::error::BootstrapError;
use crate::exec::{CommandLine, CommandRunner};
use crate::platform::PlatformContext;
use crate::prompts::Prompt;
use crate::tooling;
use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudBuild {
    Built,
    Declined,
    /// Requested, but no providers are configured. Counted as a warning.
    NotConfigured,
}

/// Offer to build a Kubernetes environment with a configured provider.
pub fn build_cloud_environment(
    providers: &[CloudProviderConfig],
    prompt: &mut dyn Prompt,
    runner: &mut dyn CommandRunner,
    platform: &mut PlatformContext,
) -> Result<CloudBuild> {
    build_with(providers, prompt, runner, platform, tooling::available)
}

fn build_with(
    providers: &[CloudProviderConfig],
    prompt: &mut dyn Prompt,
    runner: &mut dyn CommandRunner,
    platform: &mut PlatformContext,
    is_available: impl Fn(&str) -> bool,
) -> Result<CloudBuild> {
    if providers.is_empty() {
        tracing::warn!("no cloud providers are configured; skipping cloud build");
        return Ok(CloudBuild::NotConfigured);
    }
    println!("If you are installing in a cloud provider, we can help you create your kubernetes environment.");
    println!("ATTENTION: cloud environment installation is provided AS IS with no support.");
    let create = prompt.confirm(
        "Do you want to create a kubernetes environment in the Cloud?",
        false,
        "CLOUD_ENV",
    )?;
    if !create {
        tracing::info!("not building cloud environment");
        return Ok(CloudBuild::Declined);
    }

    let usable: Vec<&CloudProviderConfig> = providers
        .iter()
        .filter(|provider| is_available(&provider.program))
        .collect();
    if usable.is_empty() {
        tracing::warn!("cloud providers are configured but none of their clients are on PATH");
        return Err(BootstrapError::NoCloudProvider.into());
    }
    let names: Vec<String> = usable.iter().map(|provider| provider.name.clone()).collect();
    let choice = prompt.choose("Choose a cloud provider", &names, "CLOUD_PROVIDER")?;
    let provider = usable
        .iter()
        .find(|provider| provider.name == choice)
        .ok_or_else(|| anyhow!("unknown cloud provider {choice}"))?;

    let argv = shell_words::split(&provider.build_command)
        .with_context(|| format!("parse build command for {}", provider.name))?;
    println!("Building {} cloud k8s...", provider.name);
    let output = runner
        .run(&CommandLine::new(argv))
        .with_context(|| format!("build {} cloud environment", provider.name))?;
    if !output.success() {
        return Err(anyhow!(
            "{} cloud build failed: {}",
            provider.name,
            output.summary()
        ));
    }
    println!("Created {} cloud k8s", provider.name);
    platform.cloud_provisioned = Some(true);
    Ok(CloudBuild::Built)
}
