//! End-to-end runs of the `k8s-bootstrap` binary.
//!
//! Most sessions use `--dry-run`, so no cluster or client tools are needed:
//! the binary resolves answers, builds the plan, verifies the bundle, and
//! prints the plan as JSON. The live runs point the cluster clients at
//! `true` or `false`.

mod common;

use common::{path_arg, plan_groups, plan_json, run_bootstrap, Workspace};
use serde_json::json;

fn session_run(workspace: &Workspace, command: &str, extra: &[&str]) -> std::process::Output {
    let mut args = vec![command.to_string()];
    args.extend(workspace.session_args());
    args.extend(extra.iter().map(|arg| arg.to_string()));
    run_bootstrap(args)
}

#[test]
fn verify_reports_every_missing_manifest() {
    let workspace = Workspace::new();
    let manifests = path_arg(&workspace.manifests());
    let output = run_bootstrap(["verify", "--json", "--manifests", manifests.as_str()]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["total"], 146);
    assert_eq!(report["missing"], 146);
    assert_eq!(report["manifests"][0]["present"], false);

    workspace.write_bundle();
    let output = run_bootstrap(["verify", "--manifests", manifests.as_str()]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("146 of 146 manifests present"), "{stdout}");
}

#[test]
fn headless_install_uses_default_answers() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let answers = workspace.write_answers("answers.json", &json!({}));

    let output = session_run(
        &workspace,
        "install",
        &["--dry-run", "--mode", "headless", "--response-file", &path_arg(&answers)],
    );

    assert!(output.status.success(), "{output:?}");
    let plan = plan_json(&output.stdout);
    assert_eq!(plan["kind"], "install");
    assert_eq!(plan["platform"]["policy_variant_active"], false);
    assert_eq!(
        plan_groups(&plan),
        vec![
            "preflight:apply",
            "configuration-cspaces:apply",
            "csi:apply",
            "external:apply",
            "system-cspace:apply",
            "spark:apply",
            "drill:apply",
        ]
    );
}

#[test]
fn headless_core_install_on_policy_cluster() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let answers = workspace.write_answers(
        "answers.json",
        &json!({ "OPENSHIFT_ENV": "yes", "INSTALL_CSI": false, "CREATE_STORAGE": true }),
    );

    let output = session_run(
        &workspace,
        "install",
        &[
            "--dry-run",
            "--core-install",
            "-m",
            "headless",
            "-r",
            &path_arg(&answers),
        ],
    );

    assert!(output.status.success(), "{output:?}");
    let plan = plan_json(&output.stdout);
    assert_eq!(plan["platform"]["policy_variant_active"], true);
    let groups = plan_groups(&plan);
    assert_eq!(groups.first().map(String::as_str), Some("preflight:apply"));
    assert_eq!(
        groups.last().map(String::as_str),
        Some("bootstrap-support:delete")
    );
    assert!(groups.contains(&"system-cluster:apply".to_string()));
    assert!(!groups.contains(&"csi:apply".to_string()));

    // The secret step is listed but its values never reach the output.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"user_secret\""));
    assert!(!stdout.contains("readonly"));
}

#[test]
fn dry_run_writes_a_session_log() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let answers = workspace.write_answers("answers.json", &json!({}));

    let output = session_run(
        &workspace,
        "install",
        &["--dry-run", "--mode", "headless", "--response-file", &path_arg(&answers)],
    );
    assert!(output.status.success(), "{output:?}");

    let logs: Vec<_> = std::fs::read_dir(workspace.log_dir())
        .expect("log dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(logs.len(), 1, "{logs:?}");
    assert!(logs[0].starts_with("bootstrap-") && logs[0].ends_with(".log"));
}

#[test]
fn missing_manifest_aborts_before_planning() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    std::fs::remove_file(workspace.manifests().join("csi").join("csi-namespace.yaml"))
        .expect("remove manifest");
    let answers = workspace.write_answers("answers.json", &json!({}));

    let output = session_run(
        &workspace,
        "install",
        &["--dry-run", "--mode", "headless", "--response-file", &path_arg(&answers)],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("csi-namespace.yaml"), "{stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("\"steps\""));
}

#[test]
fn headless_requires_a_response_file() {
    let workspace = Workspace::new();
    workspace.write_bundle();

    let output = session_run(&workspace, "install", &["--dry-run", "--mode", "headless"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--response-file is required"), "{stderr}");
}

#[test]
fn uninstall_without_agreement_exits_with_declined_code() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let answers = workspace.write_answers("answers.json", &json!({ "REMOVE_CSI": true }));

    let output = session_run(
        &workspace,
        "uninstall",
        &["--dry-run", "--mode", "headless", "--response-file", &path_arg(&answers)],
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("\"steps\""));
}

#[test]
fn headless_uninstall_builds_teardown_plan() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let answers = workspace.write_answers(
        "answers.json",
        &json!({ "AGREEMENT": true, "REMOVE_CSI": true, "REMOVE_STORAGE": true }),
    );

    let output = session_run(
        &workspace,
        "uninstall",
        &["--dry-run", "--mode", "headless", "--response-file", &path_arg(&answers)],
    );

    assert!(output.status.success(), "{output:?}");
    let plan = plan_json(&output.stdout);
    assert_eq!(plan["kind"], "uninstall");
    assert_eq!(
        plan_groups(&plan),
        vec!["csi:delete", "system-cluster:delete"]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let workspace = Workspace::new();
    let config = workspace.dir.path().join("config.json");
    std::fs::write(&config, r#"{ "schema_version": 99 }"#).expect("write config");

    let output = run_bootstrap(["verify", "--config", path_arg(&config).as_str()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schema_version"), "{stderr}");
}

/// Config whose cluster clients always succeed (`true`) or always fail (`false`).
fn client_config(workspace: &Workspace, program: &str) -> String {
    let path = workspace.write_answers(
        "config.json",
        &json!({ "schema_version": 1, "kubectl": program, "policy_client": program }),
    );
    path_arg(&path)
}

#[cfg(unix)]
#[test]
fn cloud_install_without_providers_reports_a_warning() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let config = client_config(&workspace, "true");
    let answers = workspace.write_answers("answers.json", &json!({}));

    let output = session_run(
        &workspace,
        "install",
        &[
            "--cloud-install",
            "--mode",
            "headless",
            "--response-file",
            &path_arg(&answers),
            "--config",
            &config,
        ],
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("had 1 warning(s) during the bootstrapping process"),
        "{stdout}"
    );
    assert!(!stdout.contains("successfully bootstrapped"), "{stdout}");
}

#[cfg(unix)]
#[test]
fn clean_live_install_is_successful() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let config = client_config(&workspace, "true");
    let answers = workspace.write_answers("answers.json", &json!({}));

    let output = session_run(
        &workspace,
        "install",
        &[
            "--mode",
            "headless",
            "--response-file",
            &path_arg(&answers),
            "--config",
            &config,
        ],
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("has been successfully bootstrapped"), "{stdout}");
}

#[cfg(unix)]
#[test]
fn unreachable_cluster_stops_before_agreements_and_passwords() {
    let workspace = Workspace::new();
    workspace.write_bundle();
    let config = client_config(&workspace, "false");
    let answers = workspace.write_answers(
        "answers.json",
        &json!({ "CREATE_STORAGE": true, "AGREEMENT_VALIDATE": true }),
    );

    let output = session_run(
        &workspace,
        "install",
        &[
            "--core-install",
            "--mode",
            "headless",
            "--response-file",
            &path_arg(&answers),
            "--config",
            &config,
        ],
    );

    assert_eq!(output.status.code(), Some(4), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Checking cluster connectivity"), "{stdout}");
    assert!(!stdout.contains("validate the nodes"), "{stdout}");
    assert!(!stdout.contains("Installing"), "{stdout}");
}
