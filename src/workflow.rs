//! Install, uninstall, and verify command flows.
use crate::catalog::{check_manifests, ManifestCatalog, ManifestCheck};
use crate::cli::{InstallArgs, SessionArgs, UninstallArgs, VerifyArgs};
use crate::cloud::{self, CloudBuild};
use crate::config::{load_config, BootstrapConfig, DEFAULT_MANIFESTS_DIR};
use crate::error::BootstrapError;
use crate::exec::{check_cluster, Checkpoint, ClusterTools, Engine, SystemRunner};
use crate::features::FeatureSelector;
use crate::interrupt;
use crate::logging;
use crate::plan::{build_install_plan, build_uninstall_plan, Plan, PlanKind};
use crate::platform::{detect_policy_variant, PlatformContext};
use crate::prompts::{open_responses, validate_mode, Prompt, Prompter, SharedResponses};
use crate::report;
use crate::secrets::SecretBundle;
use crate::tooling::{self, LocalTool};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a single install or uninstall run needs.
struct Session {
    config: BootstrapConfig,
    manifests: PathBuf,
    log_path: PathBuf,
    responses: SharedResponses,
    prompter: Prompter,
    runner: SystemRunner,
    tools: ClusterTools,
    dry_run: bool,
    /// Warnings raised outside the plan; they count toward the verdict.
    warnings: usize,
}

impl Session {
    fn open(args: &SessionArgs) -> Result<Self> {
        validate_mode(args.mode, args.response_file.as_deref())?;
        let config = load_config(args.config.as_deref())?;
        let log_dir = args
            .log_dir
            .clone()
            .or_else(|| config.log_dir.clone())
            .unwrap_or_else(logging::default_log_dir);
        let log_path = logging::init(&log_dir)?;
        tracing::info!(
            mode = ?args.mode,
            response_file = ?args.response_file,
            dry_run = args.dry_run,
            "session started"
        );

        let responses = open_responses(args.mode, args.response_file.as_deref())?;
        interrupt::install(responses.clone())?;
        let tools = ClusterTools::from_config(&config)?;
        let manifests = manifests_root(args.manifests.as_deref(), &config);
        Ok(Self {
            prompter: Prompter::new(args.mode, responses.clone()),
            config,
            manifests,
            log_path,
            responses,
            runner: SystemRunner,
            tools,
            dry_run: args.dry_run,
            warnings: 0,
        })
    }

    fn require(&self, tool: LocalTool) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let program = match tool {
            LocalTool::Kubectl => self.tools.kubectl_program(),
            LocalTool::PolicyClient => self.tools.policy_program(),
        };
        tooling::require(tool, program)?;
        Ok(())
    }

    fn load_catalog(&self) -> Result<ManifestCatalog> {
        let catalog = ManifestCatalog::load(&self.manifests)?;
        println!("Loaded manifests from {}", catalog.root().display());
        Ok(catalog)
    }

    fn persist_responses(&self) -> Result<()> {
        self.responses
            .lock()
            .map_err(|_| anyhow!("response file lock poisoned"))?
            .persist()
    }

    /// Print a dry-run plan, or execute it and report the verdict.
    fn execute(
        &mut self,
        plan: &Plan,
        catalog: &ManifestCatalog,
        platform: PlatformContext,
        secrets: Option<&SecretBundle>,
    ) -> Result<()> {
        plan.verify(catalog)?;
        if self.dry_run {
            let text = serde_json::to_string_pretty(plan).context("serialize plan")?;
            println!("{text}");
            return Ok(());
        }
        let result = Engine::new(
            &mut self.runner,
            &mut self.prompter,
            catalog,
            &self.tools,
            platform,
        )
        .with_secrets(secrets)
        .with_session_warnings(self.warnings)
        .run(plan);
        report::report(plan.kind, &result, Some(&self.log_path));
        if let Some(gate) = result.aborted_at {
            return Err(BootstrapError::FatalGate {
                checkpoint: gate.checkpoint,
                detail: gate.detail,
            }
            .into());
        }
        Ok(())
    }
}

fn manifests_root(flag: Option<&Path>, config: &BootstrapConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.manifests_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFESTS_DIR))
}

fn prologue(kind: PlanKind) {
    let role = match kind {
        PlanKind::Install => "Installer",
        PlanKind::Uninstall => "Uninstaller",
    };
    println!();
    println!(
        "Kubernetes Platform Bootstrap {role} (version {})",
        env!("CARGO_PKG_VERSION")
    );
}

pub fn run_install(args: InstallArgs) -> Result<()> {
    let mut session = Session::open(&args.session)?;
    prologue(PlanKind::Install);
    let outcome = install(&args, &mut session);
    let saved = session.persist_responses();
    outcome?;
    saved
}

fn install(args: &InstallArgs, session: &mut Session) -> Result<()> {
    session.require(LocalTool::Kubectl)?;
    let catalog = session.load_catalog()?;
    let mut platform = PlatformContext::default();

    if args.cloud_install {
        if session.dry_run {
            tracing::warn!("cloud environment build skipped in dry run");
        } else {
            let built = cloud::build_cloud_environment(
                &session.config.cloud_providers,
                &mut session.prompter,
                &mut session.runner,
                &mut platform,
            )
            .context("build cloud environment")?;
            if built == CloudBuild::NotConfigured {
                session.warnings += 1;
            }
        }
    }

    // Settle reachability before asking for agreements and passwords.
    if !session.dry_run {
        println!("Checking cluster connectivity...");
        check_cluster(&mut session.runner, &session.tools).map_err(|detail| {
            BootstrapError::FatalGate {
                checkpoint: Checkpoint::ClusterReachable,
                detail,
            }
        })?;
    }

    if session.config.asks("OPENSHIFT_ENV", true) {
        let openshift = session.prompter.confirm(
            "Installing to an Openshift environment?",
            false,
            "OPENSHIFT_ENV",
        )?;
        if openshift {
            session.require(LocalTool::PolicyClient)?;
            platform.policy_variant_active = true;
        }
    }

    let flags = FeatureSelector::install(&session.config, args.core_install)
        .select(&mut session.prompter, &mut platform)?;

    let secrets = if flags.storage {
        confirm_node_validation(&mut session.prompter)?;
        Some(SecretBundle::collect(
            &mut session.prompter,
            &session.config.secrets,
        )?)
    } else {
        None
    };

    let plan = build_install_plan(&flags, &platform);
    tracing::info!(groups = ?plan.groups(), platform = ?platform, "install plan built");
    session.execute(&plan, &catalog, platform, secrets.as_ref())
}

fn confirm_node_validation(prompt: &mut dyn Prompt) -> Result<()> {
    println!();
    println!("The bootstrapper will now validate the nodes in your cluster.");
    println!("Node validation components are removed again once the install finishes.");
    if prompt.confirm("Do you agree?", true, "AGREEMENT_VALIDATE")? {
        return Ok(());
    }
    Err(BootstrapError::UserDeclined {
        agreement: "AGREEMENT_VALIDATE".to_string(),
    }
    .into())
}

pub fn run_uninstall(args: UninstallArgs) -> Result<()> {
    let mut session = Session::open(&args.session)?;
    prologue(PlanKind::Uninstall);
    let outcome = uninstall(&mut session);
    let saved = session.persist_responses();
    outcome?;
    saved
}

fn uninstall(session: &mut Session) -> Result<()> {
    session.require(LocalTool::Kubectl)?;
    let catalog = session.load_catalog()?;

    println!();
    println!("This will uninstall the selected operators from your Kubernetes environment.");
    println!("Removing compute spaces destroys them. They cannot be recovered!");
    if !session
        .prompter
        .confirm("Do you agree?", false, "AGREEMENT")?
    {
        println!("Very wise decision. Exiting uninstall...");
        return Err(BootstrapError::UserDeclined {
            agreement: "AGREEMENT".to_string(),
        }
        .into());
    }

    let mut platform = PlatformContext::default();
    if session.dry_run {
        tracing::info!("policy variant detection skipped in dry run");
    } else {
        platform.policy_variant_active = detect_policy_variant(&mut session.runner, &session.tools);
    }

    let flags =
        FeatureSelector::uninstall(&session.config).select(&mut session.prompter, &mut platform)?;
    let plan = build_uninstall_plan(&flags, &platform);
    tracing::info!(groups = ?plan.groups(), platform = ?platform, "uninstall plan built");
    session.execute(&plan, &catalog, platform, None)
}

#[derive(Serialize)]
struct VerifyReport<'a> {
    root: String,
    total: usize,
    missing: usize,
    manifests: &'a [ManifestCheck],
}

pub fn run_verify(args: VerifyArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let root = manifests_root(args.manifests.as_deref(), &config);
    let checks = check_manifests(&root);
    let missing = checks.iter().filter(|check| !check.present).count();

    if args.json {
        let report = VerifyReport {
            root: root.display().to_string(),
            total: checks.len(),
            missing,
            manifests: &checks,
        };
        let text = serde_json::to_string_pretty(&report).context("serialize verify report")?;
        println!("{text}");
    } else {
        for check in checks.iter().filter(|check| !check.present) {
            println!("missing {} ({})", check.path, check.key);
        }
        println!(
            "{} of {} manifests present under {}",
            checks.len() - missing,
            checks.len(),
            root.display()
        );
    }

    if missing > 0 {
        return Err(BootstrapError::ManifestNotFound(format!(
            "{missing} manifest(s) missing under {}",
            root.display()
        ))
        .into());
    }
    Ok(())
}
