use super::*;
use crate::catalog::ManifestKey;
use crate::config::SecretDefaults;
use crate::features::FeatureFlags;
use crate::plan::{build_install_plan, build_uninstall_plan, group_step, GroupId};
use crate::test_support::{loaded_catalog, RecordingRunner, ScriptedPrompt};
use std::path::PathBuf;

fn tools() -> ClusterTools {
    ClusterTools::new(vec!["kubectl".to_string()], vec!["oc".to_string()])
}

fn csi_only() -> FeatureFlags {
    FeatureFlags {
        csi: true,
        ..FeatureFlags::default()
    }
}

fn openshift() -> PlatformContext {
    PlatformContext {
        policy_variant_active: true,
        cloud_provisioned: Some(false),
    }
}

fn run(
    runner: &mut RecordingRunner,
    prompt: &mut ScriptedPrompt,
    catalog: &ManifestCatalog,
    plan: &Plan,
    platform: PlatformContext,
) -> ExecutionResult {
    let tools = tools();
    Engine::new(runner, prompt, catalog, &tools, platform).run(plan)
}

#[test]
fn failed_operations_are_counted_and_the_run_continues() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = build_install_plan(&csi_only(), &platform);
    let csi_ops = group_step(GroupId::Csi, Mode::Apply, &platform)
        .operations
        .len();
    let mut runner = RecordingRunner::default()
        .fail_matching("csi-attacher-cr.yaml")
        .fail_matching("csi-nodeplugin-sa.yaml");
    let mut prompt = ScriptedPrompt::default();

    let result = run(&mut runner, &mut prompt, &catalog, &plan, platform);

    assert_eq!(result.attempted, csi_ops);
    assert_eq!(result.errors, 2);
    assert_eq!(result.warnings, 0);
    assert!(result.aborted_at.is_none());
    // Connectivity check plus one command per operation.
    assert_eq!(runner.commands.len(), csi_ops + 1);
    let failed: Vec<_> = result
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == OutcomeStatus::Failed)
        .map(|outcome| outcome.operation.as_str())
        .collect();
    assert_eq!(failed, vec!["apply csi-nodeplugin-sa", "apply csi-attacher-cr"]);
    assert!(result
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == OutcomeStatus::Failed)
        .all(|outcome| outcome.detail.as_deref() == Some("error: simulated failure")));
}

#[test]
fn unreachable_cluster_aborts_before_any_operation() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = build_install_plan(&csi_only(), &platform);
    let mut runner = RecordingRunner::default().fail_matching("get nodes");
    let mut prompt = ScriptedPrompt::default();

    let result = run(&mut runner, &mut prompt, &catalog, &plan, platform);

    assert_eq!(result.attempted, 0);
    assert_eq!(result.errors, 1);
    assert_eq!(runner.commands, vec!["kubectl get nodes"]);
    let gate = result.aborted_at.expect("aborted");
    assert_eq!(gate.checkpoint, Checkpoint::ClusterReachable);
    assert!(gate.detail.contains("simulated failure"), "{}", gate.detail);
}

#[test]
fn missing_kubectl_aborts_at_the_connectivity_check() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = build_install_plan(&csi_only(), &platform);
    let mut runner = RecordingRunner::default().unavailable();
    let mut prompt = ScriptedPrompt::default();

    let result = run(&mut runner, &mut prompt, &catalog, &plan, platform);

    assert_eq!(result.attempted, 0);
    assert_eq!(
        result.aborted_at.map(|gate| gate.checkpoint),
        Some(Checkpoint::ClusterReachable)
    );
}

#[test]
fn declining_to_continue_stops_after_bootstrap_components() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let flags = FeatureFlags {
        storage: true,
        csi: true,
        ..FeatureFlags::default()
    };
    let plan = build_install_plan(&flags, &platform);
    let bootstrap_ops = group_step(GroupId::BootstrapSupport, Mode::Apply, &platform)
        .operations
        .len();
    let mut runner = RecordingRunner::default();
    let mut prompt = ScriptedPrompt::answering(&[("CONTINUE_INSTALL", false)]);

    let result = run(&mut runner, &mut prompt, &catalog, &plan, platform);

    assert_eq!(result.attempted, bootstrap_ops);
    assert_eq!(result.errors, 1);
    assert_eq!(prompt.asked, vec!["CONTINUE_INSTALL"]);
    assert_eq!(
        result.aborted_at.map(|gate| gate.checkpoint),
        Some(Checkpoint::ReadyToProceed)
    );
    assert!(runner.commands.iter().all(|command| !command.contains("csi")));
}

#[test]
fn repeated_apply_produces_the_same_outcomes() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let flags = FeatureFlags {
        spark: true,
        drill: true,
        ..FeatureFlags::default()
    };
    let plan = build_install_plan(&flags, &platform);

    let mut first_runner = RecordingRunner::default();
    let first = run(
        &mut first_runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );
    let mut second_runner = RecordingRunner::default();
    let second = run(
        &mut second_runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    assert_eq!(first, second);
    assert_eq!(first_runner.commands, second_runner.commands);
    assert_eq!(first.errors, 0);
}

#[test]
fn tolerant_deletes_pass_ignore_not_found() {
    let (dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = build_uninstall_plan(&csi_only(), &platform);
    let mut runner = RecordingRunner::default();

    let result = run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    let crb = dir.path().join("csi").join("csi-attacher-crb.yaml");
    let namespace = dir.path().join("csi").join("csi-namespace.yaml");
    let delete_argv = |path: &PathBuf, tail: &[&str]| {
        let mut argv = vec![
            "kubectl".to_string(),
            "delete".to_string(),
            "-f".to_string(),
            path.display().to_string(),
        ];
        argv.extend(tail.iter().map(|part| part.to_string()));
        argv
    };
    assert!(runner.argvs.contains(&delete_argv(&crb, &["--ignore-not-found"])));
    assert!(runner.argvs.contains(&delete_argv(&namespace, &[])));
    // Teardown starts from the last applied resource.
    assert_eq!(
        runner.argvs.first(),
        Some(&delete_argv(
            &dir.path().join("csi").join("csi-deploy-provisioner.yaml"),
            &[]
        ))
    );
    assert_eq!(
        runner.argvs.last(),
        Some(&delete_argv(&namespace, &[]))
    );
    assert_eq!(result.errors, 0);
}

#[test]
fn policy_platform_uses_policy_client_for_security_objects() {
    let (dir, catalog) = loaded_catalog();
    let platform = openshift();
    let plan = build_install_plan(&csi_only(), &platform);
    let mut runner = RecordingRunner::default();

    let result = run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    let scc = dir.path().join("csi").join("csi-scc.yaml");
    assert!(runner.argvs.contains(&vec![
        "oc".to_string(),
        "apply".to_string(),
        "-f".to_string(),
        scc.display().to_string(),
    ]));
    assert!(runner.commands.contains(
        &"oc adm policy add-cluster-role-to-user csi-nodeplugin-cr system:serviceaccount:mapr-csi:csi-nodeplugin-sa"
            .to_string()
    ));
    assert!(runner
        .commands
        .iter()
        .any(|command| command.ends_with("csi-deploy-openshift-nodeplugin.yaml")));
    assert!(runner
        .commands
        .iter()
        .all(|command| !command.ends_with("csi-deploy-nodeplugin.yaml")));
    assert_eq!(result.errors, 0);
    assert_eq!(result.warnings, 0);
}

#[test]
fn teardown_unbinds_before_removing_the_security_object() {
    let (_dir, catalog) = loaded_catalog();
    let platform = openshift();
    let flags = FeatureFlags {
        drill: true,
        ..FeatureFlags::default()
    };
    let plan = build_uninstall_plan(&flags, &platform);
    let mut runner = RecordingRunner::default();

    run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    let position = |needle: &str| {
        runner
            .commands
            .iter()
            .position(|command| command.contains(needle))
            .unwrap_or_else(|| panic!("no command containing {needle}"))
    };
    let unbind = position("remove-cluster-role-from-user drilloperator-cr");
    let scc = position("drill-scc.yaml");
    assert_eq!(unbind + 1, scc);
    assert!(runner.commands[scc].starts_with("oc delete -f"));
}

#[test]
fn operations_for_another_platform_are_skipped_with_a_warning() {
    let (_dir, catalog) = loaded_catalog();
    let vanilla = PlatformContext::default();
    let plan = build_install_plan(&csi_only(), &vanilla);
    let mut runner = RecordingRunner::default();

    // Plan built for a vanilla cluster, engine told it is running on the
    // policy variant.
    let result = run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        openshift(),
    );

    assert_eq!(result.warnings, 2);
    let skipped: Vec<_> = result
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == OutcomeStatus::Skipped)
        .map(|outcome| outcome.operation.as_str())
        .collect();
    assert_eq!(skipped, vec!["apply csi-nodeplugin", "apply csi-provisioner"]);
    assert_eq!(result.errors, 0);
}

#[test]
fn missing_secret_values_fail_only_the_secret_operation() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let flags = FeatureFlags {
        storage: true,
        ..FeatureFlags::default()
    };
    let plan = build_install_plan(&flags, &platform);
    let mut runner = RecordingRunner::default();

    let result = run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    assert_eq!(result.errors, 1);
    let failed = result
        .outcomes
        .iter()
        .find(|outcome| outcome.status == OutcomeStatus::Failed)
        .expect("secret failure");
    assert_eq!(failed.operation, "create user secret");
    assert_eq!(failed.group, "system-cluster");
    // Operations after the secret still ran.
    assert!(runner
        .commands
        .iter()
        .any(|command| command.ends_with("system-deploy-clusteroperator.yaml")));
    assert!(runner
        .commands
        .last()
        .is_some_and(|command| command.contains("delete")));
}

#[test]
fn collected_secret_is_created_with_redacted_display() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = Plan {
        kind: crate::plan::PlanKind::Install,
        platform,
        steps: vec![group_step(GroupId::SystemCluster, Mode::Apply, &platform)],
    };
    let secrets = SecretBundle::from_defaults(&SecretDefaults::default());
    let tools = tools();
    let mut runner = RecordingRunner::default();
    let mut prompt = ScriptedPrompt::default();

    let result = Engine::new(&mut runner, &mut prompt, &catalog, &tools, platform)
        .with_secrets(Some(&secrets))
        .run(&plan);

    assert_eq!(result.errors, 0);
    let secret = runner
        .commands
        .iter()
        .find(|command| command.contains("create secret generic system-user-secrets"))
        .expect("secret command");
    assert!(secret.contains("********"));
    assert!(secret.starts_with("kubectl create secret generic system-user-secrets -n mapr-system"));
}

#[test]
fn unresolved_manifests_are_errors_without_a_command() {
    let catalog = ManifestCatalog::new(PathBuf::from("/nonexistent"));
    let platform = PlatformContext::default();
    let plan = build_install_plan(
        &FeatureFlags {
            external: true,
            ..FeatureFlags::default()
        },
        &platform,
    );
    let mut runner = RecordingRunner::default();

    let result = run(
        &mut runner,
        &mut ScriptedPrompt::default(),
        &catalog,
        &plan,
        platform,
    );

    assert_eq!(result.attempted, 1);
    assert_eq!(result.errors, 1);
    assert_eq!(runner.commands, vec!["kubectl get nodes"]);
    let detail = result.outcomes[1].detail.as_deref().unwrap_or_default();
    assert!(
        detail.contains(ManifestKey::ExternalNamespace.name()),
        "{detail}"
    );
}

#[test]
fn policy_binding_commands() {
    let binding = PolicyBinding {
        cluster_role: "maprui-cr",
        namespace: "mapr-ui",
        service_account: "maprui-sa",
    };
    let tools = ClusterTools::new(
        vec!["oc".to_string(), "--kubeconfig".to_string(), "k".to_string()],
        vec!["oc".to_string()],
    );
    assert_eq!(
        tools.bind(&binding).display,
        "oc adm policy add-cluster-role-to-user maprui-cr system:serviceaccount:mapr-ui:maprui-sa"
    );
    assert_eq!(
        tools.unbind(&binding).display,
        "oc adm policy remove-cluster-role-from-user maprui-cr system:serviceaccount:mapr-ui:maprui-sa"
    );
    assert_eq!(tools.get_nodes().display, "oc --kubeconfig k get nodes");
    assert_eq!(tools.kubectl_program(), "oc");
}

#[test]
fn session_warnings_turn_a_clean_run_into_success_with_warnings() {
    let (_dir, catalog) = loaded_catalog();
    let platform = PlatformContext::default();
    let plan = build_install_plan(&csi_only(), &platform);
    let tools = tools();
    let mut runner = RecordingRunner::default();
    let mut prompt = ScriptedPrompt::default();

    let result = Engine::new(&mut runner, &mut prompt, &catalog, &tools, platform)
        .with_session_warnings(1)
        .run(&plan);

    assert_eq!(result.errors, 0);
    assert_eq!(result.warnings, 1);
    assert_eq!(
        crate::report::Verdict::from_counts(result.errors, result.warnings),
        crate::report::Verdict::SuccessWithWarnings
    );
}
